#![no_main]

use achfile::core::*;
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

// Arbitrary text in every free-form field must still produce 94-column
// records or a clean error.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = s.splitn(4, '|');
    let (Some(name), Some(id), Some(account), Some(company)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return;
    };

    let Some(payday) = NaiveDate::from_ymd_opt(2024, 6, 14) else {
        return;
    };
    let entry = EntryBuilder::credit("021000021", account, Decimal::new(data.len() as i64, 2), payday)
        .payee(id, name)
        .build();
    let batch = BatchBuilder::new("fuzz", payday).add_entry(entry).build_unchecked();
    let config = achfile::nacha::NachaConfigBuilder::new("091000019", "1234567890", "09100001")
        .origin_name(company)
        .build();

    if let Ok(file) = achfile::nacha::to_nacha(&batch, &CompanyInfo::new(company, id), &config) {
        assert!(file.split("\r\n").all(|line| line.len() == 94));
    }
});
