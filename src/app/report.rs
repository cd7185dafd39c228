use crate::domain::model::{DistributionResult, OutputFormat};
use crate::utils::error::{FaraidError, Result};
use rust_decimal::Decimal;

/// Formats minor units as a major-unit decimal, e.g. `123456` -> `1234.56`.
pub fn to_major(minor: u64, minor_digits: u32) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(minor), minor_digits)
}

fn per_person_major(per_person_minor: Decimal, minor_digits: u32) -> Decimal {
    let divisor = Decimal::from(10_u64.pow(minor_digits));
    let mut value = (per_person_minor / divisor)
        .round_dp(minor_digits + 2)
        .normalize();
    if value.scale() < minor_digits {
        value.rescale(minor_digits);
    }
    value
}

/// Renders a result for display. Amounts are converted to major units here
/// only; the result itself is never changed.
pub fn render(result: &DistributionResult, format: OutputFormat, minor_digits: u32) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(result, minor_digits)),
        OutputFormat::Csv => render_csv(result, minor_digits),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

fn render_table(result: &DistributionResult, minor_digits: u32) -> String {
    let headers = ["Heir", "Count", "Share", "Amount", "Per person"];
    let mut rows: Vec<[String; 5]> = result
        .entries
        .iter()
        .map(|e| {
            [
                e.category.clone(),
                e.headcount.to_string(),
                e.fraction_label.clone(),
                to_major(e.group_amount, minor_digits).to_string(),
                per_person_major(e.per_person_amount, minor_digits).to_string(),
            ]
        })
        .collect();
    rows.push([
        "surplus".to_string(),
        String::new(),
        result.unclaimed_share.to_string(),
        to_major(result.surplus_amount, minor_digits).to_string(),
        String::new(),
    ]);

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: [&str; 5]| -> String {
        format!(
            "{:<w0$}  {:>w1$}  {:<w2$}  {:>w3$}  {:>w4$}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            cells[4],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
            w4 = widths[4],
        )
        .trim_end()
        .to_string()
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Estate: {}\n",
        to_major(result.total_estate.minor_units(), minor_digits)
    ));
    out.push_str(&line(headers));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 8));
    out.push('\n');
    for row in &rows {
        out.push_str(&line([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
            row[4].as_str(),
        ]));
        out.push('\n');
    }
    out
}

fn render_csv(result: &DistributionResult, minor_digits: u32) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["category", "heir", "headcount", "share", "amount", "per_person"])?;

    for e in &result.entries {
        writer.write_record([
            e.category.clone(),
            e.heir.to_string(),
            e.headcount.to_string(),
            e.fraction_label.clone(),
            to_major(e.group_amount, minor_digits).to_string(),
            per_person_major(e.per_person_amount, minor_digits).to_string(),
        ])?;
    }
    writer.write_record([
        "surplus".to_string(),
        String::new(),
        String::new(),
        result.unclaimed_share.to_string(),
        to_major(result.surplus_amount, minor_digits).to_string(),
        String::new(),
    ])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| FaraidError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| FaraidError::ConfigValidationError {
        field: "output".to_string(),
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::compute;
    use crate::domain::model::{DecedentSex, EstateAmount, HeirCategory, HeirCensus};

    fn sample() -> DistributionResult {
        let census = HeirCensus::new(DecedentSex::Male)
            .with(HeirCategory::Son, 1)
            .with(HeirCategory::Daughter, 1);
        compute(&census, EstateAmount::from_minor_units(900_000)).unwrap()
    }

    #[test]
    fn test_to_major() {
        assert_eq!(to_major(123_456, 2).to_string(), "1234.56");
        assert_eq!(to_major(5, 0).to_string(), "5");
    }

    #[test]
    fn test_table_lists_every_entry_and_surplus() {
        let table = render(&sample(), OutputFormat::Table, 2).unwrap();
        assert!(table.starts_with("Estate: 9000.00"));
        assert!(table.contains("son (residuary)"));
        assert!(table.contains("daughter (residuary)"));
        assert!(table.contains("6000.00"));
        assert!(table.contains("3000.00"));
        assert!(table.lines().any(|l| l.starts_with("surplus")));
    }

    #[test]
    fn test_csv_output() {
        let csv = render(&sample(), OutputFormat::Csv, 2).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("category,heir,headcount,share,amount,per_person")
        );
        assert_eq!(
            lines.next(),
            Some("son (residuary),son,1,residue 2:1,6000.00,6000.00")
        );
        assert_eq!(csv.lines().last(), Some("surplus,,,0,0.00,"));
    }

    #[test]
    fn test_json_output_round_trips() {
        let result = sample();
        let json = render(&result, OutputFormat::Json, 2).unwrap();
        let parsed: DistributionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
