//! Typed form state and submission-time validation.
//!
//! Forms hold the raw text the staff member typed. `validate` turns them into
//! drafts the managers accept, or a list of per-field errors to show inline.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use washwise_catalog::inventory::{InventoryEdit, NewInventoryItem};
use washwise_catalog::{ItemType, LineItem, PricingEngine, Totals};
use washwise_order::RecordDraft;
use washwise_shared::phone::format_ph_number;
use washwise_shared::{Customer, Masked};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    CustomerId,
    ItemQuantity(ItemType),
    Weight,
    Name,
    Category,
    StockQuantity,
    Unit,
    Price,
    ReorderLevel,
    DateAdded,
    LastRestocked,
    FirstName,
    LastName,
    Username,
    Email,
    Phone,
    Password,
    ConfirmPassword,
    Otp,
    ResetLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Errors collected from one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn push(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}

impl From<FormErrors> for CoreError {
    fn from(errors: FormErrors) -> Self {
        CoreError::ValidationError(errors.to_string())
    }
}

/// Blank means zero; anything else must be a whole number ≥ 0.
fn parse_count(raw: &str, field: FormField, label: &str, errors: &mut FormErrors) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Some(n),
        Ok(_) => {
            errors.push(field, format!("{} must not be negative", label));
            None
        }
        Err(_) => {
            errors.push(field, format!("{} must be a whole number", label));
            None
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

fn require(value: &str, field: FormField, message: &str, errors: &mut FormErrors) {
    if value.trim().is_empty() {
        errors.push(field, message);
    }
}

/// The insert-record form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InsertRecordForm {
    pub customer_id: String,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub service: String,
    pub batch: String,
    pub shirts: String,
    pub pants: String,
    pub jeans: String,
    pub shorts: String,
    pub towel: String,
    pub pillow_case: String,
    pub bed_sheets: String,
    pub weight_kg: String,
    pub washing: bool,
}

impl InsertRecordForm {
    pub fn new() -> Self {
        Self {
            washing: true,
            ..Self::default()
        }
    }

    pub fn quantity_field(&self, item_type: ItemType) -> &str {
        match item_type {
            ItemType::Shirts => &self.shirts,
            ItemType::Pants => &self.pants,
            ItemType::Jeans => &self.jeans,
            ItemType::Shorts => &self.shorts,
            ItemType::Towel => &self.towel,
            ItemType::PillowCase => &self.pillow_case,
            ItemType::BedSheets => &self.bed_sheets,
        }
    }

    pub fn set_quantity(&mut self, item_type: ItemType, value: impl Into<String>) {
        let slot = match item_type {
            ItemType::Shirts => &mut self.shirts,
            ItemType::Pants => &mut self.pants,
            ItemType::Jeans => &mut self.jeans,
            ItemType::Shorts => &mut self.shorts,
            ItemType::Towel => &mut self.towel,
            ItemType::PillowCase => &mut self.pillow_case,
            ItemType::BedSheets => &mut self.bed_sheets,
        };
        *slot = value.into();
    }

    /// Fill the customer block from a directory entry.
    pub fn autofill(&mut self, customer: &Customer) {
        self.customer_id = customer.id.clone();
        self.customer_name = customer.full_name();
        self.phone = customer.phone.clone();
        self.address = customer.address.clone();
    }

    pub fn clear_customer(&mut self) {
        self.customer_name.clear();
        self.phone.clear();
        self.address.clear();
    }

    /// Receipt rows for the typed quantities; a failure is reported on the field it came from.
    fn line_items(&self, engine: &PricingEngine, errors: &mut FormErrors) -> Vec<LineItem> {
        let mut items = Vec::new();
        for item_type in ItemType::ALL {
            let field = FormField::ItemQuantity(item_type);
            let Some(quantity) = parse_count(self.quantity_field(item_type), field, item_type.label(), errors) else {
                continue;
            };
            if quantity == 0 {
                continue;
            }
            match engine.line_item(item_type, quantity) {
                Ok(item) => items.push(item),
                Err(e) => errors.push(field, e.to_string()),
            }
        }
        items
    }

    /// Totals for the CALCULATE button.
    pub fn calculate(&self, engine: &PricingEngine) -> Result<Totals, FormErrors> {
        let mut errors = FormErrors::default();
        let items = self.line_items(engine, &mut errors);
        errors.into_result(|| engine.compute_total(&items))
    }

    pub fn validate(&self, engine: &PricingEngine) -> Result<RecordDraft, FormErrors> {
        let mut errors = FormErrors::default();

        require(&self.customer_id, FormField::CustomerId, "Customer ID is required", &mut errors);

        let items = self.line_items(engine, &mut errors);

        let weight_kg = match self.weight_kg.trim() {
            "" => None,
            raw => match parse_decimal(raw) {
                Some(kg) if kg >= Decimal::ZERO => Some(kg),
                _ => {
                    errors.push(FormField::Weight, "Weight must be a non-negative number of kilograms");
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        if items.is_empty() && weight_kg.is_none() {
            errors.push(FormField::ItemQuantity(ItemType::Shirts), "Enter at least one item or the weight");
        }

        errors.into_result(|| RecordDraft {
            customer_id: self.customer_id.trim().to_string(),
            customer_name: self.customer_name.trim().to_string(),
            service: self.service.trim().to_string(),
            batch: self.batch.trim().to_string(),
            items,
            weight_kg,
            washing: self.washing,
        })
    }
}

/// The add-inventory-item form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryItemForm {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub unit: String,
    pub price: String,
    pub reorder_level: String,
    pub date_added: String,
    pub last_restocked: String,
}

impl InventoryItemForm {
    /// Blank form with both dates set to `today`.
    pub fn new(today: NaiveDate) -> Self {
        let today = today.format("%Y-%m-%d").to_string();
        Self {
            date_added: today.clone(),
            last_restocked: today,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<NewInventoryItem, FormErrors> {
        let mut errors = FormErrors::default();

        require(&self.name, FormField::Name, "Item name is required", &mut errors);
        require(&self.category, FormField::Category, "Category is required", &mut errors);
        require(&self.unit, FormField::Unit, "Unit is required", &mut errors);

        let quantity = match self.quantity.trim().parse::<u32>() {
            Ok(q) if q > 0 => Some(q),
            _ => {
                errors.push(FormField::StockQuantity, "Valid quantity is required");
                None
            }
        };

        let price = match parse_decimal(&self.price) {
            Some(p) if p > Decimal::ZERO => Some(p),
            _ => {
                errors.push(FormField::Price, "Valid price is required");
                None
            }
        };

        let reorder_level = match self.reorder_level.trim().parse::<u32>() {
            Ok(r) => Some(r),
            Err(_) => {
                errors.push(FormField::ReorderLevel, "Valid reorder level is required");
                None
            }
        };

        let date_added = parse_date(&self.date_added, FormField::DateAdded, "Date added is required", &mut errors);
        let last_restocked = parse_date(
            &self.last_restocked,
            FormField::LastRestocked,
            "Last restocked date is required",
            &mut errors,
        );

        match (quantity, price, reorder_level, date_added, last_restocked) {
            (Some(quantity), Some(price), Some(reorder_level), Some(date_added), Some(last_restocked))
                if errors.is_empty() =>
            {
                Ok(NewInventoryItem {
                    name: self.name.trim().to_string(),
                    category: self.category.trim().to_string(),
                    quantity,
                    unit: self.unit.trim().to_string(),
                    price,
                    reorder_level,
                    date_added,
                    last_restocked,
                })
            }
            _ => Err(errors),
        }
    }

    /// Stock value preview shown under the form.
    pub fn preview_value(&self) -> Decimal {
        let price = parse_decimal(&self.price).unwrap_or(Decimal::ZERO);
        let quantity = parse_decimal(&self.quantity).unwrap_or(Decimal::ZERO);
        price * quantity
    }
}

fn parse_date(raw: &str, field: FormField, message: &str, errors: &mut FormErrors) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, message);
            None
        }
    }
}

/// The inline edit row of the inventory list. Blank fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryEditForm {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub unit: String,
    pub price: String,
    pub reorder_level: String,
}

impl InventoryEditForm {
    pub fn validate(&self) -> Result<InventoryEdit, FormErrors> {
        let mut errors = FormErrors::default();

        let non_blank = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        let quantity = self.optional_count(&self.quantity, FormField::StockQuantity, "Quantity", &mut errors);
        let reorder_level =
            self.optional_count(&self.reorder_level, FormField::ReorderLevel, "Reorder level", &mut errors);

        let price = match self.price.trim() {
            "" => None,
            raw => match parse_decimal(raw) {
                Some(p) if p >= Decimal::ZERO => Some(p),
                _ => {
                    errors.push(FormField::Price, "Price must be a non-negative amount");
                    None
                }
            },
        };

        errors.into_result(|| InventoryEdit {
            name: non_blank(&self.name),
            category: non_blank(&self.category),
            quantity,
            unit: non_blank(&self.unit),
            price,
            reorder_level,
        })
    }

    fn optional_count(&self, raw: &str, field: FormField, label: &str, errors: &mut FormErrors) -> Option<u32> {
        if raw.trim().is_empty() {
            return None;
        }
        let count = parse_count(raw, field, label, errors)?;
        match u32::try_from(count) {
            Ok(count) => Some(count),
            Err(_) => {
                errors.push(field, format!("{} is too large", label));
                None
            }
        }
    }
}

/// Staff sign-up form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub address: String,
    pub username: String,
    pub contact_number: String,
    pub email: String,
    pub password: Masked<String>,
    pub confirm_password: Masked<String>,
}

/// Validated registration, phone already in E.164
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub address: String,
    pub username: String,
    pub contact_number: String,
    pub email: String,
    pub password: Masked<String>,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<RegistrationDraft, FormErrors> {
        let mut errors = FormErrors::default();

        require(&self.first_name, FormField::FirstName, "First name is required", &mut errors);
        require(&self.last_name, FormField::LastName, "Last name is required", &mut errors);
        require(&self.username, FormField::Username, "Username is required", &mut errors);

        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            errors.push(FormField::Email, "A valid email is required");
        }

        if self.password.expose().is_empty() {
            errors.push(FormField::Password, "Password is required");
        } else if self.password.expose() != self.confirm_password.expose() {
            errors.push(FormField::ConfirmPassword, "Passwords do not match");
        }

        let contact_number = match format_ph_number(&self.contact_number) {
            Ok(number) => number,
            Err(_) => {
                errors.push(FormField::Phone, "Invalid Philippine phone number!");
                String::new()
            }
        };

        errors.into_result(|| RegistrationDraft {
            first_name: self.first_name.trim().to_string(),
            middle_name: self.middle_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            address: self.address.trim().to_string(),
            username: self.username.trim().to_string(),
            contact_number,
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Check the six-digit code from the verification email.
pub fn parse_otp(raw: &str) -> Result<String, FormErrors> {
    let code = raw.trim();
    let mut errors = FormErrors::default();
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        errors.push(FormField::Otp, "Enter the 6-digit code sent to your email");
    }
    errors.into_result(|| code.to_string())
}

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Form behind the emailed reset-password link
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub email: String,
    pub password: Masked<String>,
    pub confirm_password: Masked<String>,
}

/// Body of the reset-password request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReset {
    pub token: Masked<String>,
    pub email: String,
    #[serde(rename = "newPassword")]
    pub new_password: Masked<String>,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<PasswordReset, FormErrors> {
        let mut errors = FormErrors::default();

        if self.token.trim().is_empty() || self.email.trim().is_empty() {
            errors.push(FormField::ResetLink, "Invalid reset link");
        }

        if self.password.expose().chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(
                FormField::Password,
                format!("Password must be at least {} characters long", MIN_PASSWORD_LENGTH),
            );
        } else if self.password.expose() != self.confirm_password.expose() {
            errors.push(FormField::ConfirmPassword, "Passwords do not match");
        }

        errors.into_result(|| PasswordReset {
            token: self.token.trim().into(),
            email: self.email.trim().to_string(),
            new_password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_form_calculates_totals() {
        let engine = PricingEngine::default();
        let mut form = InsertRecordForm::new();
        form.set_quantity(ItemType::Shirts, "2");
        form.set_quantity(ItemType::Towel, " 3 ");

        let totals = form.calculate(&engine).unwrap();
        assert_eq!(totals.total, dec!(66.00));
        assert_eq!(totals.count, 5);
    }

    #[test]
    fn test_record_form_validation() {
        let engine = PricingEngine::default();
        let mut form = InsertRecordForm::new();
        form.set_quantity(ItemType::Pants, "-1");
        form.set_quantity(ItemType::Jeans, "two");
        form.weight_kg = "heavy".to_string();

        let errors = form.validate(&engine).unwrap_err();
        assert_eq!(errors.get(FormField::CustomerId), Some("Customer ID is required"));
        assert_eq!(
            errors.get(FormField::ItemQuantity(ItemType::Pants)),
            Some("Pants must not be negative")
        );
        assert_eq!(
            errors.get(FormField::ItemQuantity(ItemType::Jeans)),
            Some("Jeans must be a whole number")
        );
        assert!(errors.get(FormField::Weight).is_some());
    }

    #[test]
    fn test_out_of_range_quantity_is_reported_on_its_own_field() {
        let engine = PricingEngine::default();
        let mut form = InsertRecordForm::new();
        form.customer_id = "C-0015".to_string();
        form.set_quantity(ItemType::Shirts, "2");
        form.set_quantity(ItemType::Towel, "5000000000");

        let errors = form.calculate(&engine).unwrap_err();
        assert!(errors.get(FormField::ItemQuantity(ItemType::Towel)).is_some());
        assert!(errors.get(FormField::ItemQuantity(ItemType::Shirts)).is_none());

        let errors = form.validate(&engine).unwrap_err();
        assert!(errors.get(FormField::ItemQuantity(ItemType::Towel)).is_some());
        assert!(errors.get(FormField::ItemQuantity(ItemType::Shirts)).is_none());
    }

    #[test]
    fn test_record_form_produces_draft() {
        let engine = PricingEngine::default();
        let mut form = InsertRecordForm::new();
        form.autofill(&Customer {
            id: "C-0015".to_string(),
            first_name: "Alexa".to_string(),
            last_name: "Cruz".to_string(),
            phone: "+639123456789".to_string(),
            address: "123 Main St".to_string(),
        });
        form.set_quantity(ItemType::BedSheets, "1");
        form.weight_kg = "7.5".to_string();

        let draft = form.validate(&engine).unwrap();
        assert_eq!(draft.customer_name, "Alexa Cruz");
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.weight_kg, Some(dec!(7.5)));
        assert!(draft.washing);
    }

    #[test]
    fn test_empty_record_is_rejected() {
        let engine = PricingEngine::default();
        let mut form = InsertRecordForm::new();
        form.customer_id = "C-0001".to_string();
        assert!(form.validate(&engine).is_err());
    }

    #[test]
    fn test_inventory_form_rules() {
        let form = InventoryItemForm {
            name: " ".to_string(),
            quantity: "0".to_string(),
            price: "abc".to_string(),
            reorder_level: "-2".to_string(),
            ..InventoryItemForm::default()
        };

        let errors = form.validate().unwrap_err();
        for field in [
            FormField::Name,
            FormField::Category,
            FormField::Unit,
            FormField::StockQuantity,
            FormField::Price,
            FormField::ReorderLevel,
            FormField::DateAdded,
            FormField::LastRestocked,
        ] {
            assert!(errors.get(field).is_some(), "expected an error for {:?}", field);
        }
    }

    #[test]
    fn test_inventory_form_produces_item() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
        let form = InventoryItemForm {
            name: "Fabric Softener".to_string(),
            category: "Cleaning Supplies".to_string(),
            quantity: "32".to_string(),
            unit: "liters".to_string(),
            price: "280".to_string(),
            reorder_level: "15".to_string(),
            ..InventoryItemForm::new(today)
        };

        let item = form.validate().unwrap();
        assert_eq!(item.quantity, 32);
        assert_eq!(item.date_added, today);
        assert_eq!(form.preview_value(), dec!(8960));
    }

    #[test]
    fn test_edit_form_blank_fields_are_unchanged() {
        let form = InventoryEditForm {
            quantity: "0".to_string(),
            ..InventoryEditForm::default()
        };
        let edit = form.validate().unwrap();
        assert_eq!(edit.quantity, Some(0));
        assert_eq!(edit.name, None);
        assert_eq!(edit.price, None);

        let negative = InventoryEditForm {
            reorder_level: "-5".to_string(),
            ..InventoryEditForm::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_registration_rules() {
        let form = RegistrationForm {
            first_name: "Rina".to_string(),
            last_name: "Lopez".to_string(),
            username: "rina".to_string(),
            email: "rina@example.com".to_string(),
            contact_number: "0912 345 6789".to_string(),
            password: "secret".into(),
            confirm_password: "secret".into(),
            ..RegistrationForm::default()
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.contact_number, "+639123456789");

        let mismatch = RegistrationForm {
            confirm_password: "other".into(),
            contact_number: "123".to_string(),
            ..form
        };
        let errors = mismatch.validate().unwrap_err();
        assert_eq!(errors.get(FormField::ConfirmPassword), Some("Passwords do not match"));
        assert_eq!(errors.get(FormField::Phone), Some("Invalid Philippine phone number!"));
    }

    #[test]
    fn test_otp_must_be_six_digits() {
        assert_eq!(parse_otp(" 012345 ").unwrap(), "012345");
        for bad in ["", "12345", "1234567", "12a456"] {
            let errors = parse_otp(bad).unwrap_err();
            assert!(errors.get(FormField::Otp).is_some());
        }
    }

    #[test]
    fn test_reset_password_rules() {
        let form = ResetPasswordForm {
            token: "tok-1".to_string(),
            email: "rina@example.com".to_string(),
            password: "short".into(),
            confirm_password: "short".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(FormField::Password),
            Some("Password must be at least 8 characters long")
        );

        let mismatch = ResetPasswordForm {
            password: "longenough".into(),
            confirm_password: "longenougH".into(),
            ..form.clone()
        };
        assert_eq!(
            mismatch.validate().unwrap_err().get(FormField::ConfirmPassword),
            Some("Passwords do not match")
        );

        let no_link = ResetPasswordForm {
            token: String::new(),
            password: "longenough".into(),
            confirm_password: "longenough".into(),
            ..form.clone()
        };
        assert!(no_link.validate().unwrap_err().get(FormField::ResetLink).is_some());

        let valid = ResetPasswordForm {
            password: "longenough".into(),
            confirm_password: "longenough".into(),
            ..form
        };
        let reset = valid.validate().unwrap();
        let json = serde_json::to_value(&reset).unwrap();
        assert_eq!(json["newPassword"], "longenough");
        assert_eq!(json["token"], "tok-1");
    }
}
