use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{AppError, AppResult};

pub const ORDER_NUMBER_MAX: usize = 50;
pub const CLIENT_NAME_MAX: usize = 100;
pub const DEVICE_TYPE_MAX: usize = 100;
pub const BRAND_MODEL_MAX: usize = 50;
pub const SERIAL_MAX: usize = 100;
pub const TEXT_MAX: usize = 1000;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

// Digits with optional leading +, plus the usual separators. Digit count and
// total length are checked separately so punctuation cannot pad a too-short
// number past the limit.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ().\-]+$").expect("phone regex"));

const PHONE_LEN_MIN: usize = 8;
const PHONE_LEN_MAX: usize = 20;
const PHONE_DIGITS_MIN: usize = 8;
const PHONE_DIGITS_MAX: usize = 15;

pub type Violations = BTreeMap<String, String>;

/// The full editable field set of an order, after create/update defaults and
/// merging have been applied. Both the creation and the edit path validate
/// through here so there is a single canonical rule per field.
#[derive(Debug)]
pub struct OrderFields<'a> {
    pub order_number: &'a str,
    pub client_name: &'a str,
    pub client_phone: Option<&'a str>,
    pub client_email: Option<&'a str>,
    pub device_type: &'a str,
    pub device_brand: Option<&'a str>,
    pub device_model: Option<&'a str>,
    pub serial_number: Option<&'a str>,
    pub description: Option<&'a str>,
    pub received_date: NaiveDate,
    pub estimated_delivery: Option<NaiveDate>,
}

/// Checks every rule and reports all violations at once as a field→message
/// map, never just the first one.
pub fn validate_order(fields: &OrderFields) -> AppResult<()> {
    let mut violations = Violations::new();

    check_required(
        &mut violations,
        "order_number",
        fields.order_number,
        ORDER_NUMBER_MAX,
    );
    check_required(
        &mut violations,
        "client_name",
        fields.client_name,
        CLIENT_NAME_MAX,
    );
    check_required(
        &mut violations,
        "device_type",
        fields.device_type,
        DEVICE_TYPE_MAX,
    );
    check_max_len(
        &mut violations,
        "device_brand",
        fields.device_brand,
        BRAND_MODEL_MAX,
    );
    check_max_len(
        &mut violations,
        "device_model",
        fields.device_model,
        BRAND_MODEL_MAX,
    );
    check_max_len(
        &mut violations,
        "serial_number",
        fields.serial_number,
        SERIAL_MAX,
    );
    check_max_len(&mut violations, "description", fields.description, TEXT_MAX);

    if let Some(email) = trimmed(fields.client_email) {
        if !EMAIL_RE.is_match(email) {
            violations.insert(
                "client_email".into(),
                "formato de correo inválido".into(),
            );
        }
    }

    if let Some(phone) = trimmed(fields.client_phone) {
        if !is_valid_phone(phone) {
            violations.insert(
                "client_phone".into(),
                "teléfono inválido: se esperan entre 8 y 15 dígitos".into(),
            );
        }
    }

    if let Some(estimated) = fields.estimated_delivery {
        if estimated < fields.received_date {
            violations.insert(
                "estimated_delivery".into(),
                "la fecha estimada de entrega no puede ser anterior a la fecha de recepción"
                    .into(),
            );
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations))
    }
}

/// Note text: non-empty after trimming, at most `TEXT_MAX` chars.
pub fn validate_note_text(text: &str) -> AppResult<()> {
    let mut violations = Violations::new();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        violations.insert("description".into(), "la nota no puede estar vacía".into());
    } else if trimmed.chars().count() > TEXT_MAX {
        violations.insert(
            "description".into(),
            format!("no debe exceder {TEXT_MAX} caracteres"),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations))
    }
}

fn is_valid_phone(phone: &str) -> bool {
    if !PHONE_RE.is_match(phone) {
        return false;
    }
    let len = phone.chars().count();
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (PHONE_LEN_MIN..=PHONE_LEN_MAX).contains(&len)
        && (PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&digits)
}

fn check_required(violations: &mut Violations, field: &str, value: &str, max: usize) {
    let value = value.trim();
    if value.is_empty() {
        violations.insert(field.into(), "requerido".into());
    } else if value.chars().count() > max {
        violations.insert(field.into(), format!("no debe exceder {max} caracteres"));
    }
}

fn check_max_len(violations: &mut Violations, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = trimmed(value) {
        if value.chars().count() > max {
            violations.insert(field.into(), format!("no debe exceder {max} caracteres"));
        }
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_fields() -> OrderFields<'static> {
        OrderFields {
            order_number: "UJ-2026-001",
            client_name: "María Rodríguez",
            client_phone: Some("+52 123 456 7890"),
            client_email: Some("maria@ejemplo.com"),
            device_type: "Reloj de pulsera",
            device_brand: Some("Rolex"),
            device_model: Some("Datejust 41"),
            serial_number: Some("R-78901234"),
            description: Some("Cambio de batería"),
            received_date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            estimated_delivery: Some(NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()),
        }
    }

    fn violations_of(fields: &OrderFields) -> Violations {
        match validate_order(fields) {
            Err(AppError::Validation(v)) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_order_passes() {
        assert!(validate_order(&base_fields()).is_ok());
    }

    #[test]
    fn missing_required_fields_all_reported_at_once() {
        let mut fields = base_fields();
        fields.order_number = "";
        fields.client_name = "   ";
        fields.device_type = "";

        let violations = violations_of(&fields);
        assert_eq!(violations.len(), 3);
        assert_eq!(violations["order_number"], "requerido");
        assert_eq!(violations["client_name"], "requerido");
        assert_eq!(violations["device_type"], "requerido");
    }

    #[test]
    fn overlong_fields_rejected() {
        let long = "x".repeat(51);
        let mut fields = base_fields();
        fields.device_brand = Some(&long);

        let violations = violations_of(&fields);
        assert!(violations.contains_key("device_brand"));
    }

    #[test]
    fn email_shape_checked_only_when_present() {
        let mut fields = base_fields();
        fields.client_email = None;
        assert!(validate_order(&fields).is_ok());

        fields.client_email = Some("no-es-un-correo");
        let violations = violations_of(&fields);
        assert!(violations.contains_key("client_email"));

        fields.client_email = Some("cliente@ejemplo.com");
        assert!(validate_order(&fields).is_ok());
    }

    #[test]
    fn phone_accepts_digits_and_punctuation() {
        let mut fields = base_fields();
        for phone in ["+52 123 456 7890", "(55) 1234-5678", "5512345678"] {
            fields.client_phone = Some(phone);
            assert!(validate_order(&fields).is_ok(), "rejected {phone}");
        }
    }

    #[test]
    fn phone_rejects_too_few_digits_and_letters() {
        let mut fields = base_fields();
        for phone in ["123", "12-34-56", "555 CALL ME", "()---...()"] {
            fields.client_phone = Some(phone);
            let violations = violations_of(&fields);
            assert!(violations.contains_key("client_phone"), "accepted {phone}");
        }
    }

    #[test]
    fn estimated_delivery_before_reception_rejected() {
        let mut fields = base_fields();
        fields.estimated_delivery = Some(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());

        let violations = violations_of(&fields);
        assert!(violations.contains_key("estimated_delivery"));
    }

    #[test]
    fn estimated_delivery_same_day_allowed() {
        let mut fields = base_fields();
        fields.estimated_delivery = Some(fields.received_date);
        assert!(validate_order(&fields).is_ok());
    }

    #[test]
    fn note_text_rules() {
        assert!(validate_note_text("Pieza requiere batería especial").is_ok());
        assert!(validate_note_text("").is_err());
        assert!(validate_note_text("   \n ").is_err());
        assert!(validate_note_text(&"x".repeat(1001)).is_err());
        assert!(validate_note_text(&"x".repeat(1000)).is_ok());
    }
}
