//! Localized month names used by the portal

/// Portuguese month names as they appear on the portal, indexed by `month - 1`
pub const MONTH_LABELS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Returns the localized label for a month number
///
/// Returns None for anything outside 1..=12.
pub fn month_label(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_LABELS.get(index).copied()
}
