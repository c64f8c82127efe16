//! 货币值对象

use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// 货币代码 (ISO 4217)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(pub String);

impl Currency {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    pub fn vnd() -> Self {
        Self("VND".to_string())
    }

    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// 三位大写字母
    pub fn is_valid(&self) -> bool {
        self.0.len() == 3 && self.0.chars().all(|c| c.is_ascii_uppercase())
    }

    pub fn is_vnd(&self) -> bool {
        self.0 == "VND"
    }

    /// 最小货币单位的小数位数；越南盾没有辅币
    pub fn minor_units(&self) -> u32 {
        match self.0.as_str() {
            "VND" | "JPY" | "KRW" => 0,
            _ => 2,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 金额值对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// 金额（以最小单位存储；VND 即为 đồng）
    pub amount: i64,
    /// 货币代码
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    pub fn vnd(amount: i64) -> Self {
        Self::new(amount, Currency::vnd())
    }

    pub fn usd(cents: i64) -> Self {
        Self::new(cents, Currency::usd())
    }

    fn scale(&self) -> f64 {
        10f64.powi(self.currency.minor_units() as i32)
    }

    /// 转换为浮点数（用于显示）
    pub fn to_decimal(&self) -> f64 {
        self.amount as f64 / self.scale()
    }

    /// 从浮点数创建
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let scale = 10f64.powi(currency.minor_units() as i32);
        Self::new((amount * scale).round() as i64, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// 同币种相加，币种不同或溢出时返回 None
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(amount, self.currency.clone()))
    }

    /// 按百分比计算（四舍五入到最小单位）
    pub fn percentage(&self, percent: u32) -> Money {
        let value = (self.amount as i128 * percent as i128 + 50) / 100;
        Money::new(value as i64, self.currency.clone())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, multiplier: i64) -> Self {
        Self::new(self.amount * multiplier, self.currency)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = self.currency.minor_units() as usize;
        write!(f, "{:.*} {}", precision, self.to_decimal(), self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_normalized() {
        let currency = Currency::new(" vnd ");
        assert_eq!(currency, Currency::vnd());
        assert!(currency.is_valid());
        assert!(currency.is_vnd());
        assert!(!Currency::new("dong").is_valid());
    }

    #[test]
    fn test_vnd_has_no_minor_units() {
        let price = Money::vnd(150_000);
        assert_eq!(price.to_decimal(), 150_000.0);
        assert_eq!(price.to_string(), "150000 VND");
        assert_eq!(Money::from_decimal(99_999.6, Currency::vnd()).amount, 100_000);
    }

    #[test]
    fn test_usd_display() {
        assert_eq!(Money::usd(1250).to_string(), "12.50 USD");
    }

    #[test]
    fn test_checked_add_rejects_mixed_currencies() {
        assert_eq!(
            Money::vnd(1_000).checked_add(&Money::vnd(500)),
            Some(Money::vnd(1_500))
        );
        assert_eq!(Money::vnd(1_000).checked_add(&Money::usd(500)), None);
    }

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(Money::vnd(150_000).percentage(10), Money::vnd(15_000));
        assert_eq!(Money::vnd(15).percentage(10), Money::vnd(2));
    }
}
