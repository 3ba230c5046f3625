use supplyroute_allocation::AllocationReport;
use supplyroute_evaluators::CacheStats;

/// Human-readable run summary printed after allocation
pub fn render_summary(report: &AllocationReport, cache: &CacheStats, fallbacks: u64) -> String {
    let mut out = String::new();
    out.push_str("\nAllocation Summary:\n");
    out.push_str(&format!(
        "  Total products allocated: {}\n",
        report.allocated()
    ));
    out.push_str(&format!(
        "  Total cost: ${}\n",
        format_amount(report.total_cost())
    ));
    out.push_str(&format!(
        "  Average lead time: {:.1} days\n",
        report.average_lead_time()
    ));
    if !report.misses.is_empty() {
        out.push_str(&format!("  Unallocated chunks: {}\n", report.misses.len()));
    }
    if fallbacks > 0 {
        out.push_str(&format!("  Unknown-method fallbacks: {fallbacks}\n"));
    }
    out.push_str(&format!("\nCache performance: {cache}\n"));
    out
}

/// Two decimals with thousands separators, e.g. `1,234.50`; non-finite
/// values print as-is
fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.2}", value.abs());
    let (whole, frac) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(150.0), "150.00");
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(1_000_000.0), "1,000,000.00");
        assert_eq!(format_amount(-2500.5), "-2,500.50");
    }

    #[test]
    fn non_finite_amounts_are_not_grouped() {
        assert_eq!(format_amount(f64::INFINITY), "inf");
        assert_eq!(format_amount(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_amount(f64::NAN), "NaN");
    }

    #[test]
    fn summary_of_empty_run() {
        let report = AllocationReport::default();
        let stats = CacheStats::default();
        let text = render_summary(&report, &stats, 0);
        assert!(text.contains("Total products allocated: 0"));
        assert!(text.contains("Total cost: $0.00"));
        assert!(text.contains("Average lead time: 0.0 days"));
        assert!(text.contains("Cache performance: Hits: 0, Misses: 0, Hit Rate: 0.0%, Size: 0"));
        assert!(!text.contains("fallbacks"));
    }
}
