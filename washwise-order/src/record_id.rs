use chrono::{DateTime, Datelike, Utc};

/// Issues receipt numbers of the form `YY-NNNN`, restarting each year.
#[derive(Debug, Clone)]
pub struct RecordIdGenerator {
    year: i32,
    last: u32,
}

impl RecordIdGenerator {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            year: now.year(),
            last: 0,
        }
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> String {
        if now.year() != self.year {
            self.year = now.year();
            self.last = 0;
        }
        self.last += 1;
        format!("{:02}-{:04}", self.year.rem_euclid(100), self.last)
    }

    /// Hand back the most recently issued id so it can be issued again.
    pub fn release(&mut self, id: &str) {
        if parse(id) == Some((self.year.rem_euclid(100), self.last)) && self.last > 0 {
            self.last -= 1;
        }
    }

    /// Make sure later ids come after an existing one (e.g. records loaded from the API).
    pub fn observe(&mut self, id: &str) {
        let Some((year, sequence)) = parse(id) else {
            return;
        };
        if year == self.year.rem_euclid(100) && sequence > self.last {
            self.last = sequence;
        }
    }
}

fn parse(id: &str) -> Option<(i32, u32)> {
    let (year, sequence) = id.split_once('-')?;
    Some((year.parse().ok()?, sequence.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sequence_and_year_rollover() {
        let december = Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap();
        let january = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();

        let mut ids = RecordIdGenerator::new(december);
        assert_eq!(ids.next_id(december), "25-0001");
        assert_eq!(ids.next_id(december), "25-0002");
        assert_eq!(ids.next_id(january), "26-0001");
    }

    #[test]
    fn test_observe_skips_past_existing_ids() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut ids = RecordIdGenerator::new(now);

        ids.observe("25-0015");
        ids.observe("25-0009");
        ids.observe("24-0100");
        ids.observe("not-an-id");

        assert_eq!(ids.next_id(now), "25-0016");
    }

    #[test]
    fn test_release_only_rewinds_the_latest_id() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut ids = RecordIdGenerator::new(now);
        let first = ids.next_id(now);
        let second = ids.next_id(now);

        ids.release(&first);
        assert_eq!(ids.next_id(now), "25-0003");

        ids.release("25-0003");
        assert_eq!(ids.next_id(now), "25-0003");
        assert_eq!(second, "25-0002");
    }
}
