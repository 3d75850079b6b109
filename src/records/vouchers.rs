//! Voucher Records

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    records::{RecordError, format_percentage, format_price, parse_percentage, parse_price},
    vouchers::{Voucher, VoucherCatalog, VoucherKind},
};

/// Wrapper for vouchers in YAML
#[derive(Debug, Deserialize)]
pub struct VouchersRecord {
    /// Map of voucher code -> voucher record
    pub vouchers: FxHashMap<String, VoucherRecord>,
}

/// Discount type of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherKindRecord {
    /// Fixed amount off.
    Fixed,

    /// Percentage off.
    Percentage,
}

/// Voucher record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherRecord {
    /// Discount type
    #[serde(rename = "type")]
    pub kind: VoucherKindRecord,

    /// Discount value: a price for `FIXED` (e.g. "50000 IDR"), a percentage for `PERCENTAGE`
    /// (e.g. "10%")
    pub value: String,

    /// Minimum subtotal (e.g. "300000 IDR")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_purchase: Option<String>,

    /// First valid day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<Date>,

    /// Last valid day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<Date>,
}

impl VoucherRecord {
    /// Converts the record into a voucher with `code`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value or minimum purchase cannot be parsed.
    pub fn into_voucher(self, code: &str) -> Result<Voucher<'static>, RecordError> {
        let kind = match self.kind {
            VoucherKindRecord::Fixed => VoucherKind::Fixed(parse_price(&self.value)?),
            VoucherKindRecord::Percentage => {
                VoucherKind::Percentage(parse_percentage(&self.value)?)
            }
        };

        let mut voucher =
            Voucher::new(code, kind).with_validity(self.valid_from, self.valid_until);

        if let Some(min_purchase) = &self.min_purchase {
            voucher = voucher.with_min_purchase(parse_price(min_purchase)?);
        }

        Ok(voucher)
    }
}

impl From<&Voucher<'_>> for VoucherRecord {
    fn from(voucher: &Voucher<'_>) -> Self {
        let (kind, value) = match &voucher.kind {
            VoucherKind::Fixed(amount) => (VoucherKindRecord::Fixed, format_price(amount)),
            VoucherKind::Percentage(percent) => {
                (VoucherKindRecord::Percentage, format_percentage(percent))
            }
        };

        Self {
            kind,
            value,
            min_purchase: voucher.min_purchase.as_ref().map(format_price),
            valid_from: voucher.valid_from,
            valid_until: voucher.valid_until,
        }
    }
}

impl VouchersRecord {
    /// Builds a catalog from every voucher in the record.
    ///
    /// # Errors
    ///
    /// Returns the first voucher conversion error.
    pub fn into_catalog(self) -> Result<VoucherCatalog<'static>, RecordError> {
        self.vouchers
            .into_iter()
            .map(|(code, record)| record.into_voucher(&code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::{Money, iso::IDR};
    use testresult::TestResult;

    use super::*;

    const YAML: &str = r"
vouchers:
  WELCOME10:
    type: PERCENTAGE
    value: 10%
  FLAT50K:
    type: FIXED
    value: 50000 IDR
    min_purchase: 300000 IDR
    valid_from: 2026-01-01
    valid_until: 2026-06-30
";

    #[test]
    fn vouchers_load_into_a_catalog() -> TestResult {
        let record: VouchersRecord = serde_norway::from_str(YAML)?;
        let catalog = record.into_catalog()?;

        assert_eq!(catalog.len(), 2);

        let flat = catalog.get("flat50k");

        assert_eq!(
            flat.and_then(|voucher| voucher.min_purchase),
            Some(Money::from_minor(300_000 * 10_i64.pow(IDR.exponent), IDR))
        );
        assert_eq!(
            flat.and_then(|voucher| voucher.valid_until),
            Some(date(2026, 6, 30))
        );

        Ok(())
    }

    #[test]
    fn unknown_voucher_type_is_rejected() {
        let yaml = "vouchers:\n  ODD:\n    type: BOGO\n    value: 1\n";

        assert!(serde_norway::from_str::<VouchersRecord>(yaml).is_err());
    }

    #[test]
    fn malformed_value_is_rejected() -> TestResult {
        let yaml = "vouchers:\n  BAD:\n    type: FIXED\n    value: lots\n";

        let record: VouchersRecord = serde_norway::from_str(yaml)?;

        assert!(matches!(
            record.into_catalog(),
            Err(RecordError::InvalidPrice(_))
        ));

        Ok(())
    }
}
