//! # Exception Requests
//!
//! An [`ExceptionRequest`] documents why a shift should proceed despite
//! its violations. It is built from the engine's violations plus a
//! caller-supplied [`JustificationPacket`], then checked for completeness
//! by [`validate_exception`].
//!
//! ## Completeness Rules
//!
//! Always required: justification, supervisor approval, risk assessment,
//! mitigation plan. Management approval is additionally required when any
//! source violation is high-risk.
//!
//! Validation reports every missing field at once so the caller can
//! re-prompt for exactly those pieces. It never fails.

use serde::{Deserialize, Serialize};

use fatigue_core::{OperatorId, Shift, ShiftId, Timestamp};
use fatigue_rules::Violation;

use crate::workflow::ExceptionError;

/// Caller-supplied documentation for an exception.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JustificationPacket {
    pub justification: String,
    pub supervisor_approval: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_approval: Option<String>,
    pub risk_assessment: String,
    pub mitigation_plan: String,
}

/// A request to override one shift's violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionRequest {
    /// Shift the exception applies to; absent while the shift is a candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<ShiftId>,
    pub operator_id: OperatorId,
    /// Rule names of the source violations, comma-joined.
    #[serde(default)]
    pub violation_type: String,
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub supervisor_approval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_approval: Option<String>,
    #[serde(default)]
    pub risk_assessment: String,
    #[serde(default)]
    pub mitigation_plan: String,
    /// Whether any source violation is high-risk.
    #[serde(default)]
    pub is_high_risk: bool,
    #[serde(default = "Timestamp::now")]
    pub created_at: Timestamp,
}

impl ExceptionRequest {
    /// Build a request for `shift` from its violations.
    ///
    /// # Errors
    ///
    /// Fails if there is nothing to except, or if any violation is not
    /// exception-eligible (e.g. an overlap).
    pub fn from_violations(
        shift: &Shift,
        violations: &[Violation],
        packet: JustificationPacket,
    ) -> Result<Self, ExceptionError> {
        if violations.is_empty() {
            return Err(ExceptionError::NoViolations);
        }
        if let Some(blocking) = violations.iter().find(|v| !v.is_exception_eligible()) {
            return Err(ExceptionError::IneligibleViolation {
                rule: blocking.rule.to_string(),
            });
        }

        let mut rules: Vec<&str> = Vec::new();
        for v in violations {
            let name = v.rule.as_str();
            if !rules.contains(&name) {
                rules.push(name);
            }
        }

        Ok(Self {
            shift_id: shift.id(),
            operator_id: shift.operator_id().clone(),
            violation_type: rules.join(", "),
            justification: packet.justification,
            supervisor_approval: packet.supervisor_approval,
            management_approval: packet.management_approval,
            risk_assessment: packet.risk_assessment,
            mitigation_plan: packet.mitigation_plan,
            is_high_risk: violations.iter().any(Violation::is_high_risk),
            created_at: Timestamp::now(),
        })
    }
}

/// List the fields an exception request is missing.
///
/// An empty list means the request is complete.
pub fn validate_exception(request: &ExceptionRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&request.justification) {
        errors.push("Justification is required".to_string());
    }
    if is_blank(&request.supervisor_approval) {
        errors.push("Supervisor approval is required".to_string());
    }
    if is_blank(&request.risk_assessment) {
        errors.push("Risk assessment is required".to_string());
    }
    if is_blank(&request.mitigation_plan) {
        errors.push("Mitigation plan is required".to_string());
    }
    if request.is_high_risk && request.management_approval.as_deref().map_or(true, is_blank) {
        errors.push("Management approval is required for high-risk exceptions".to_string());
    }
    errors
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use fatigue_rules::{Rule, Severity};

    fn shift() -> Shift {
        let start = DateTime::parse_from_rfc3339("2026-03-02T06:00:00Z").unwrap();
        Shift::new(OperatorId::new("op-1"), start, start + Duration::hours(15)).unwrap()
    }

    fn complete_packet() -> JustificationPacket {
        JustificationPacket {
            justification: "Unit restart needs qualified board operator".into(),
            supervisor_approval: "J. Ortiz".into(),
            management_approval: None,
            risk_assessment: "Moderate; relief operator on site".into(),
            mitigation_plan: "Extra rounds, 30 min break at hour 12".into(),
        }
    }

    fn violation(rule: Rule, severity: Severity) -> Violation {
        Violation::new(rule, severity, "test", 15.0, 14.0)
    }

    fn request(is_high_risk: bool, management_approval: Option<&str>) -> ExceptionRequest {
        let packet = JustificationPacket {
            management_approval: management_approval.map(str::to_string),
            ..complete_packet()
        };
        let mut req = ExceptionRequest::from_violations(
            &shift(),
            &[violation(Rule::MaxShiftLength, Severity::Violation)],
            packet,
        )
        .unwrap();
        req.is_high_risk = is_high_risk;
        req
    }

    #[test]
    fn complete_request_has_no_errors() {
        assert!(validate_exception(&request(false, None)).is_empty());
    }

    #[test]
    fn high_risk_without_management_approval_has_one_error() {
        let errors = validate_exception(&request(true, Some("")));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Management approval"));
    }

    #[test]
    fn high_risk_with_management_approval_is_complete() {
        assert!(validate_exception(&request(true, Some("Plant manager"))).is_empty());
    }

    #[test]
    fn every_missing_field_reported() {
        let req = ExceptionRequest::from_violations(
            &shift(),
            &[violation(Rule::ExtremeShiftLength, Severity::HighRisk)],
            JustificationPacket {
                justification: "   ".into(),
                ..JustificationPacket::default()
            },
        )
        .unwrap();
        assert_eq!(validate_exception(&req).len(), 5);
    }

    #[test]
    fn high_risk_computed_from_violations() {
        let req = ExceptionRequest::from_violations(
            &shift(),
            &[
                violation(Rule::MaxShiftLength, Severity::Violation),
                violation(Rule::MinimumRest, Severity::HighRisk),
            ],
            complete_packet(),
        )
        .unwrap();
        assert!(req.is_high_risk);
        assert_eq!(req.violation_type, "max_shift_length, minimum_rest");
    }

    #[test]
    fn repeated_rules_named_once() {
        let req = ExceptionRequest::from_violations(
            &shift(),
            &[
                violation(Rule::WorkSetHours, Severity::Violation),
                violation(Rule::WorkSetHours, Severity::Violation),
            ],
            complete_packet(),
        )
        .unwrap();
        assert_eq!(req.violation_type, "work_set_hours");
    }

    #[test]
    fn overlap_cannot_be_excepted() {
        let overlap = Violation::blocking(Rule::ShiftOverlap, "overlap", 1.0, 0.0);
        let err = ExceptionRequest::from_violations(
            &shift(),
            &[violation(Rule::MaxShiftLength, Severity::Violation), overlap],
            complete_packet(),
        )
        .unwrap_err();
        assert!(matches!(err, ExceptionError::IneligibleViolation { ref rule } if rule == "shift_overlap"));
    }

    #[test]
    fn nothing_to_except() {
        let err = ExceptionRequest::from_violations(&shift(), &[], complete_packet()).unwrap_err();
        assert!(matches!(err, ExceptionError::NoViolations));
    }

    #[test]
    fn wire_request_with_missing_fields_still_parses() {
        let json = r#"{ "operatorId": "op-3", "isHighRisk": true, "justification": "storm" }"#;
        let req: ExceptionRequest = serde_json::from_str(json).unwrap();
        let errors = validate_exception(&req);
        assert_eq!(errors.len(), 4);
    }
}
