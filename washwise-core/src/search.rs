//! Case-insensitive search over in-memory lists.
//!
//! Filtering is lazy and restartable: a [`RecordFilter`] borrows the source
//! list and can be iterated any number of times. Throttling repeated calls
//! while the user types is up to the caller.

/// Reads one searchable text field from a record.
pub type FieldAccessor<R> = fn(&R) -> &str;

pub struct RecordFilter<'a, R> {
    records: &'a [R],
    needle: Option<String>,
    fields: &'a [FieldAccessor<R>],
}

impl<'a, R> RecordFilter<'a, R> {
    pub fn new(records: &'a [R], query: &str, fields: &'a [FieldAccessor<R>]) -> Self {
        // Blank input shows everything; anything else matches literally, spaces included.
        let needle = (!query.trim().is_empty()).then(|| query.to_lowercase());
        Self {
            records,
            needle,
            fields,
        }
    }

    /// True when the query is blank and every record passes through.
    pub fn is_passthrough(&self) -> bool {
        self.needle.is_none()
    }

    pub fn matches(&self, record: &R) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => self
                .fields
                .iter()
                .any(|field| field(record).to_lowercase().contains(needle.as_str())),
        }
    }

    pub fn iter(&self) -> Matches<'_, 'a, R> {
        Matches {
            filter: self,
            inner: self.records.iter(),
        }
    }

    pub fn to_vec(&self) -> Vec<&'a R> {
        self.iter().collect()
    }
}

/// Iterator over the records accepted by a [`RecordFilter`], in source order.
pub struct Matches<'f, 'a, R> {
    filter: &'f RecordFilter<'a, R>,
    inner: std::slice::Iter<'a, R>,
}

impl<'f, 'a, R> Iterator for Matches<'f, 'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.inner.by_ref().find(|record| filter.matches(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<'f, 'a, R> IntoIterator for &'f RecordFilter<'a, R> {
    type Item = &'a R;
    type IntoIter = Matches<'f, 'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Filter `records` by `query` over the given fields.
pub fn filter<'a, R>(records: &'a [R], query: &str, fields: &'a [FieldAccessor<R>]) -> RecordFilter<'a, R> {
    RecordFilter::new(records, query, fields)
}

/// Field sets used by the staff screens.
pub mod fields {
    use super::FieldAccessor;
    use washwise_catalog::InventoryItem;
    use washwise_order::LaundryRecord;
    use washwise_shared::Customer;

    fn customer_id(c: &Customer) -> &str {
        &c.id
    }
    fn customer_first_name(c: &Customer) -> &str {
        &c.first_name
    }
    fn customer_last_name(c: &Customer) -> &str {
        &c.last_name
    }

    fn item_name(i: &InventoryItem) -> &str {
        &i.name
    }
    fn item_category(i: &InventoryItem) -> &str {
        &i.category
    }

    fn record_id(r: &LaundryRecord) -> &str {
        &r.id
    }
    fn record_customer(r: &LaundryRecord) -> &str {
        &r.customer_name
    }
    fn record_customer_id(r: &LaundryRecord) -> &str {
        &r.customer_id
    }
    fn record_service(r: &LaundryRecord) -> &str {
        &r.service
    }

    /// Customer picker: id, first name, last name.
    pub const CUSTOMERS: [FieldAccessor<Customer>; 3] = [customer_id, customer_first_name, customer_last_name];

    /// Inventory list: name, category.
    pub const INVENTORY: [FieldAccessor<InventoryItem>; 2] = [item_name, item_category];

    /// Record and payment lists: receipt number, customer, service.
    pub const RECORDS: [FieldAccessor<LaundryRecord>; 4] =
        [record_id, record_customer, record_customer_id, record_service];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        customer: String,
        service: String,
    }

    fn row(id: &str, customer: &str, service: &str) -> Row {
        Row {
            id: id.to_string(),
            customer: customer.to_string(),
            service: service.to_string(),
        }
    }

    fn id(r: &Row) -> &str {
        &r.id
    }
    fn customer(r: &Row) -> &str {
        &r.customer
    }
    fn service(r: &Row) -> &str {
        &r.service
    }

    const FIELDS: [FieldAccessor<Row>; 3] = [id, customer, service];

    fn rows() -> Vec<Row> {
        vec![
            row("25-0015", "Alexa Cruz", "Wash + Fold"),
            row("25-0013", "Miguel Santos", "Premium Hand Wash"),
            row("25-0011", "James Patterson", "Express Wash"),
            row("25-0009", "Maria Garcia", "Dry Cleaning"),
        ]
    }

    #[test]
    fn test_blank_query_returns_everything_in_order() {
        let rows = rows();
        for query in ["", "   ", "\t\n"] {
            let result = filter(&rows, query, &FIELDS).to_vec();
            assert_eq!(result, rows.iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_case_insensitive_match() {
        let rows = rows();
        let result = filter(&rows, "cruz", &FIELDS).to_vec();
        assert_eq!(result, vec![&rows[0]]);

        let result = filter(&rows, "EXPRESS", &FIELDS).to_vec();
        assert_eq!(result, vec![&rows[2]]);
    }

    #[test]
    fn test_surrounding_spaces_are_part_of_the_query() {
        let rows = rows();
        assert!(filter(&rows, "cruz ", &FIELDS).to_vec().is_empty());

        let result = filter(&rows, "hand wash", &FIELDS).to_vec();
        assert_eq!(result, vec![&rows[1]]);
        let result = filter(&rows, " santos", &FIELDS).to_vec();
        assert_eq!(result, vec![&rows[1]]);
    }

    #[test]
    fn test_any_field_matches_and_order_is_kept() {
        let rows = rows();
        let ids: Vec<&str> = filter(&rows, "wash", &FIELDS).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["25-0015", "25-0013", "25-0011"]);

        let ids: Vec<&str> = filter(&rows, "25-001", &FIELDS).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["25-0015", "25-0013", "25-0011"]);
    }

    #[test]
    fn test_only_listed_fields_are_searched() {
        let rows = rows();
        const ID_ONLY: [FieldAccessor<Row>; 1] = [id];
        assert_eq!(filter(&rows, "garcia", &ID_ONLY).iter().count(), 0);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let rows = rows();
        assert!(filter(&rows, "zzz", &FIELDS).to_vec().is_empty());
        let empty: Vec<Row> = Vec::new();
        assert!(filter(&empty, "cruz", &FIELDS).to_vec().is_empty());
    }

    #[test]
    fn test_filter_is_restartable() {
        let rows = rows();
        let filtered = filter(&rows, "a", &FIELDS);
        let first: Vec<&Row> = filtered.iter().collect();
        let second: Vec<&Row> = (&filtered).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rows = rows();
        for query in ["wash", "ma", "25-0013", ""] {
            let once: Vec<Row> = filter(&rows, query, &FIELDS).iter().cloned().collect();
            let twice: Vec<Row> = filter(&once, query, &FIELDS).iter().cloned().collect();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_customer_field_set() {
        let customers = vec![
            washwise_shared::Customer {
                id: "25-0015".to_string(),
                first_name: "Alexa".to_string(),
                last_name: "Cruz".to_string(),
                phone: String::new(),
                address: String::new(),
            },
            washwise_shared::Customer {
                id: "25-0013".to_string(),
                first_name: "Miguel".to_string(),
                last_name: "Santos".to_string(),
                phone: String::new(),
                address: String::new(),
            },
        ];
        let found = filter(&customers, "cruz", &fields::CUSTOMERS).to_vec();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "25-0015");
    }
}
