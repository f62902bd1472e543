use achfile::core::*;
use achfile::export::{to_csv, to_json};
use achfile::nacha::{NachaConfigBuilder, parse_nacha, to_nacha};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn main() -> Result<(), AchError> {
    // RUST_LOG=debug shows record counts and totals; warn shows truncated fields
    env_logger::init();

    let payday = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    let batch = BatchBuilder::new("batch-2024-06-14", payday)
        .name("Regular Payroll")
        .status(BatchStatus::Scheduled)
        .add_entry(
            EntryBuilder::credit("021000021", "000123456789", dec!(1500.00), payday)
                .payee("EMP-001", "Jane Roe")
                .description("June payroll")
                .build(),
        )
        .add_entry(
            EntryBuilder::credit("011000138", "987654321", dec!(2250.75), payday)
                .payee("EMP-002", "Maximilian Alexander Johnson-Smith")
                .description("June payroll")
                .build(),
        )
        .add_entry(
            EntryBuilder::debit("121000358", "55512345", dec!(100), payday)
                .payee("EMP-003", "Pat Smith")
                .description("Advance repayment")
                .build(),
        )
        .build()?;

    let company = CompanyInfo::new("ACME CORP", "1234567890");
    let config = NachaConfigBuilder::new("091000019", "1234567890", "09100001")
        .destination_name("WELLS FARGO")
        .origin_name("ACME CORP")
        .build();

    // NACHA
    let file = to_nacha(&batch, &company, &config)?;
    println!("=== NACHA ===");
    for line in file.split("\r\n") {
        println!("{line}");
    }

    let parsed = parse_nacha(&file)?;
    let problems = parsed.verify();
    println!(
        "\nRead back {} records, {} entries, credits {}, debits {}: {}",
        parsed.record_count(),
        parsed.entries().count(),
        parsed.control.total_credit,
        parsed.control.total_debit,
        if problems.is_empty() { "controls OK" } else { "controls MISMATCH" }
    );

    // CSV
    println!("\n=== CSV ===");
    println!("{}", to_csv(&batch.entries)?);

    // JSON
    println!("\n=== JSON ===");
    println!("{}", to_json(&batch)?);

    Ok(())
}
