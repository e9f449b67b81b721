use anyhow::{anyhow, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn parse_decimal(value: &str) -> Result<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| anyhow!("Parse decimal: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_rounds_to_cents() {
        assert_eq!(round2(10.006), 10.01);
        assert_eq!(round2(2.0 * 5.0), 10.0);
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(19.99 * 3.0), 59.97);
    }

    #[test]
    fn round2_is_stable() {
        let once = round2(3.3333333);
        assert_eq!(round2(once), once);
    }

    #[test]
    fn parse_decimal_accepts_comma_separator() {
        assert_eq!(parse_decimal("12,50").unwrap(), 12.5);
        assert_eq!(parse_decimal(" 99.95 ").unwrap(), 99.95);
        assert!(parse_decimal("n/a").is_err());
    }

    #[test]
    fn sha256_hex_is_deterministic() {
        assert_eq!(sha256_hex(b"invoice"), sha256_hex(b"invoice"));
        assert_ne!(sha256_hex(b"invoice"), sha256_hex(b"receipt"));
        assert_eq!(sha256_hex(b"").len(), 64);
    }
}
