//! Journal validation: the correctness gate for all financial data.

use chrono::{Days, Months, NaiveDate};

use ledgerpost_core::{PostingError, PostingResult, amounts_equal};

use crate::account::ChartOfAccounts;
use crate::entry::JournalLine;
use ledgerpost_core::TenantId;

/// Outcome of line validation. All violations are collected, not
/// short-circuited, so the caller sees the complete error set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a set of journal lines against the tenant's chart of accounts.
///
/// Checks, in order: at least 2 lines; each line has exactly one of
/// debit/credit > 0; no negative amounts; each account exists and is active;
/// debit total equals credit total within the shared tolerance.
pub fn validate_lines<C: ChartOfAccounts>(
    chart: &C,
    tenant_id: TenantId,
    lines: &[JournalLine],
) -> ValidationReport {
    let mut errors = Vec::new();

    if lines.len() < 2 {
        errors.push(format!(
            "journal entry requires at least 2 lines, got {}",
            lines.len()
        ));
    }

    for (idx, line) in lines.iter().enumerate() {
        let n = idx + 1;
        let has_debit = line.debit > 0.0;
        let has_credit = line.credit > 0.0;
        if has_debit && has_credit {
            errors.push(format!("line {n}: cannot be both debit and credit"));
        }
        if !has_debit && !has_credit {
            errors.push(format!("line {n}: must have a debit or credit amount"));
        }
    }

    for (idx, line) in lines.iter().enumerate() {
        let n = idx + 1;
        if line.debit < 0.0 || line.credit < 0.0 {
            errors.push(format!("line {n}: amounts cannot be negative"));
        }
    }

    for (idx, line) in lines.iter().enumerate() {
        let n = idx + 1;
        if line.account_code.trim().is_empty() {
            errors.push(format!("line {n}: missing account reference"));
            continue;
        }
        match chart.account(tenant_id, &line.account_code) {
            Some(account) if account.active => {}
            Some(_) => errors.push(format!(
                "line {n}: account {} is inactive",
                line.account_code
            )),
            None => errors.push(format!(
                "line {n}: account {} not found",
                line.account_code
            )),
        }
    }

    let total_debit: f64 = lines.iter().map(|l| l.debit).sum();
    let total_credit: f64 = lines.iter().map(|l| l.credit).sum();
    if !amounts_equal(total_debit, total_credit) {
        errors.push(format!(
            "debits ({total_debit:.4}) do not equal credits ({total_credit:.4})"
        ));
    }

    ValidationReport::from_errors(errors)
}

/// Parse and bound-check a posting date.
///
/// Rejects unparsable input, dates more than 1 day ahead of `today`, and
/// dates more than 5 years behind it. Bounds error windows for automated
/// postings without blocking same-day or backdated-correction entries.
pub fn validate_posting_date(date: &str, today: NaiveDate) -> PostingResult<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| PostingError::validation(format!("invalid posting date '{date}': {e}")))?;

    if let Some(err) = posting_date_bounds_error(parsed, today) {
        return Err(PostingError::validation(err));
    }

    Ok(parsed)
}

/// Bound-check an already-parsed posting date against `today`. Returns the
/// violation message, or `None` when the date is inside the posting window.
pub fn posting_date_bounds_error(date: NaiveDate, today: NaiveDate) -> Option<String> {
    let max = today + Days::new(1);
    if date > max {
        return Some(format!(
            "posting date {date} is more than 1 day in the future"
        ));
    }

    let min = today - Months::new(60);
    if date < min {
        return Some(format!(
            "posting date {date} is more than 5 years in the past"
        ));
    }

    None
}
