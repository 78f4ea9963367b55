use thiserror::Error;

/// Business-rule failures surfaced by advisory validation. The pricing
/// computation itself never returns these: it defaults missing figures to
/// neutral values and clamps at the subtotal, because it sits on the
/// critical path for price display.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[cfg(test)]
mod tests {
    use super::DomainError;

    #[test]
    fn invariant_violation_formats_with_context() {
        let error = DomainError::InvariantViolation("line item 2 has a zero quantity".to_string());
        assert_eq!(
            error.to_string(),
            "domain invariant violation: line item 2 has a zero quantity"
        );
    }
}
