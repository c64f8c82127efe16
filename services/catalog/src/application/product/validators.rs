//! 商品请求校验器

use std::collections::HashSet;

use vnm_common::{Pagination, slugify};
use vnm_cqrs_core::Validator;
use vnm_domain_core::Currency;
use vnm_errors::FieldError;

use super::commands::{ApproveProductCommand, BulkUpdateProductsCommand, CreateProductCommand};
use super::queries::ListActiveProductsQuery;

const MAX_NAME_LEN: usize = 200;
const MAX_NOTES_LEN: usize = 2000;

pub struct CreateProductValidator {
    supported_currencies: HashSet<Currency>,
}

impl CreateProductValidator {
    pub fn new<S: AsRef<str>>(supported_currencies: &[S]) -> Self {
        let mut supported: HashSet<Currency> = supported_currencies
            .iter()
            .map(|c| Currency::new(c.as_ref()))
            .collect();
        supported.insert(Currency::vnd());
        Self {
            supported_currencies: supported,
        }
    }
}

impl Validator<CreateProductCommand> for CreateProductValidator {
    fn validate(&self, cmd: &CreateProductCommand) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if cmd.vendor_id.value() <= 0 {
            errors.push(FieldError::new("vendorId", "vendor id is required"));
        }

        let name = cmd.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.push(FieldError::new(
                "name",
                format!("must not exceed {} characters", MAX_NAME_LEN),
            ));
        }

        let explicit_slug = cmd.slug.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if explicit_slug.is_some_and(|s| slugify(s).is_empty()) {
            errors.push(FieldError::new("slug", "must contain letters or digits"));
        }

        if cmd.prices.is_empty() {
            errors.push(FieldError::new("prices", "at least one price is required"));
        } else if !cmd.prices.iter().any(|p| p.currency.is_vnd()) {
            errors.push(FieldError::new("prices", "a VND price is required"));
        }
        for (i, price) in cmd.prices.iter().enumerate() {
            if !price.currency.is_valid() {
                errors.push(FieldError::new(
                    format!("prices[{}].currency", i),
                    format!("'{}' is not an ISO 4217 code", price.currency),
                ));
            } else if !self.supported_currencies.contains(&price.currency) {
                errors.push(FieldError::new(
                    format!("prices[{}].currency", i),
                    format!("{} is not supported in this marketplace", price.currency),
                ));
            }
            if price.is_negative() {
                errors.push(FieldError::new(
                    format!("prices[{}].amount", i),
                    "must not be negative",
                ));
            }
        }

        let mut skus = HashSet::new();
        for (i, variant) in cmd.variants.iter().enumerate() {
            let sku = variant.sku.trim();
            if sku.is_empty() {
                errors.push(FieldError::new(format!("variants[{}].sku", i), "must not be empty"));
            } else if !skus.insert(sku.to_lowercase()) {
                errors.push(FieldError::new(
                    format!("variants[{}].sku", i),
                    format!("duplicate SKU '{}'", sku),
                ));
            }
            if variant.price_override.as_ref().is_some_and(|p| p.is_negative()) {
                errors.push(FieldError::new(
                    format!("variants[{}].priceOverride", i),
                    "must not be negative",
                ));
            }
        }

        let mut languages = HashSet::new();
        for (i, content) in cmd.contents.iter().enumerate() {
            let language = content.language.trim().to_lowercase();
            if language.is_empty() {
                errors.push(FieldError::new(
                    format!("contents[{}].language", i),
                    "must not be empty",
                ));
            } else if !languages.insert(language) {
                errors.push(FieldError::new(
                    format!("contents[{}].language", i),
                    "duplicate language",
                ));
            }
        }

        errors
    }
}

pub fn validate_approval(cmd: &ApproveProductCommand) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if cmd.product_id.value() <= 0 {
        errors.push(FieldError::new("productId", "must be a positive id"));
    }
    if cmd.admin_notes.as_ref().is_some_and(|n| n.len() > MAX_NOTES_LEN) {
        errors.push(FieldError::new(
            "adminNotes",
            format!("must not exceed {} characters", MAX_NOTES_LEN),
        ));
    }
    if cmd.is_approved && cmd.rejection_reason.is_some() {
        errors.push(FieldError::new(
            "rejectionReason",
            "only allowed when rejecting",
        ));
    }
    errors
}

pub struct BulkUpdateValidator {
    max_batch_size: usize,
}

impl BulkUpdateValidator {
    pub fn new(max_batch_size: usize) -> Self {
        Self { max_batch_size }
    }
}

impl Validator<BulkUpdateProductsCommand> for BulkUpdateValidator {
    fn validate(&self, cmd: &BulkUpdateProductsCommand) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if cmd.product_ids.len() > self.max_batch_size {
            errors.push(FieldError::new(
                "productIds",
                format!("at most {} ids per batch", self.max_batch_size),
            ));
        }
        if cmd.product_ids.iter().any(|id| id.value() <= 0) {
            errors.push(FieldError::new("productIds", "ids must be positive"));
        }
        if cmd.admin_notes.as_ref().is_some_and(|n| n.len() > MAX_NOTES_LEN) {
            errors.push(FieldError::new(
                "adminNotes",
                format!("must not exceed {} characters", MAX_NOTES_LEN),
            ));
        }
        errors
    }
}

pub fn validate_listing(query: &ListActiveProductsQuery) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if query.pagination.page == 0 {
        errors.push(FieldError::new("page", "starts at 1"));
    }
    if query.pagination.page_size == 0 || query.pagination.page_size > Pagination::MAX_PAGE_SIZE {
        errors.push(FieldError::new(
            "pageSize",
            format!("must be between 1 and {}", Pagination::MAX_PAGE_SIZE),
        ));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductVariant;
    use std::collections::BTreeMap;
    use vnm_common::VendorId;
    use vnm_domain_core::Money;

    fn command() -> CreateProductCommand {
        CreateProductCommand {
            vendor_id: VendorId(101),
            name: "Nón lá Huế".to_string(),
            slug: None,
            prices: vec![Money::vnd(85_000)],
            variants: vec![],
            contents: vec![],
            submit_for_review: false,
        }
    }

    fn sku(code: &str) -> ProductVariant {
        ProductVariant {
            sku: code.to_string(),
            attributes: BTreeMap::new(),
            stock: 1,
            price_override: None,
        }
    }

    #[test]
    fn test_valid_command_has_no_errors() {
        let validator = CreateProductValidator::new(&["VND", "USD"]);
        assert!(validator.validate(&command()).is_empty());
    }

    #[test]
    fn test_all_field_errors_reported() {
        let validator = CreateProductValidator::new(&["VND"]);
        let mut cmd = command();
        cmd.name = "  ".to_string();
        cmd.prices = vec![Money::new(-5, Currency::new("THB"))];
        cmd.variants = vec![sku("A1"), sku("a1")];

        let fields: Vec<_> = validator
            .validate(&cmd)
            .into_iter()
            .map(|e| e.field)
            .collect();

        assert_eq!(
            fields,
            [
                "name",
                "prices",
                "prices[0].currency",
                "prices[0].amount",
                "variants[1].sku"
            ]
        );
    }

    #[test]
    fn test_bulk_batch_size_limit() {
        let validator = BulkUpdateValidator::new(2);
        let cmd = BulkUpdateProductsCommand {
            product_ids: vec![vnm_common::ProductId(1); 3],
            new_status: crate::domain::product::ProductStatus::Active,
            admin_notes: None,
            admin_id: None,
            notify_vendors: false,
        };
        assert_eq!(validator.validate(&cmd).len(), 1);
    }

    #[test]
    fn test_listing_page_bounds() {
        let query = ListActiveProductsQuery {
            vendor_id: None,
            pagination: Pagination::new(0, 500),
        };
        assert_eq!(validate_listing(&query).len(), 2);
        assert!(validate_listing(&ListActiveProductsQuery::default()).is_empty());
    }
}
