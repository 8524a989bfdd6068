//! Upsert block generation for a single record

use crate::fields::split_variant_suffix;
use crate::record::GameRecord;
use crate::sql::{
    classify_product_type, infer_region, release_year, validate_rating, SqlError, SqlResult,
    PRODUCT_GROUP,
};
use std::fmt::Write;

/// Columns refreshed when an existing product is updated
const UPDATE_CLAUSE: &str = "UPDATE SET
        release_year = EXCLUDED.release_year,
        product_type = EXCLUDED.product_type,
        region = EXCLUDED.region,
        publisher = EXCLUDED.publisher,
        developer = EXCLUDED.developer,
        genre = EXCLUDED.genre,
        image_url = EXCLUDED.image_url,
        ean_gtin = EXCLUDED.ean_gtin,
        asin = EXCLUDED.asin,
        epid = EXCLUDED.epid,
        rating = EXCLUDED.rating,
        pricecharting_id = EXCLUDED.pricecharting_id,
        pricecharting_url = EXCLUDED.pricecharting_url,
        products_updated_at = NOW()";

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// A text literal, or `NULL` for absent and empty values
fn text_or_null(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => quote(v),
        _ => "NULL".to_string(),
    }
}

/// A text literal, or `''` for absent and empty values
fn text_or_empty(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => quote(v),
        _ => "''".to_string(),
    }
}

fn text_array(values: Option<&[String]>) -> String {
    match values {
        Some(values) if !values.is_empty() => {
            let items: Vec<String> = values.iter().map(|v| quote(v)).collect();
            format!("ARRAY[{}]", items.join(", "))
        }
        _ => "ARRAY[]::text[]".to_string(),
    }
}

/// Generates the SQL block for one record
///
/// # Arguments
///
/// * `record` - A record as stored in a record file
/// * `ignore_existing` - Leave existing products untouched instead of
///   updating them
///
/// # Returns
///
/// * `Ok(String)` - The `DO $$ ... $$;` block
/// * `Err(SqlError::MissingSourceUrl)` - The record has no canonical URL
pub fn generate_sql_block(record: &GameRecord, ignore_existing: bool) -> SqlResult<String> {
    let source_url = record
        .pricecharting_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| SqlError::MissingSourceUrl {
            record: record
                .id
                .map(|id| id.to_string())
                .or_else(|| record.product_name.clone())
                .unwrap_or_else(|| "<unnamed>".to_string()),
        })?;

    let mut product_name = record.product_name.clone().unwrap_or_default();
    let mut variant = record.variant_name.clone().unwrap_or_default();
    if variant.is_empty() {
        if let (base, Some(suffix)) = split_variant_suffix(&product_name) {
            product_name = base;
            variant = suffix;
        }
    }

    let product_type = classify_product_type(&product_name);
    let details = &record.details;
    let (variant, genre) = if product_type.clears_extras() {
        (String::new(), None)
    } else {
        (variant, details.genre.as_deref())
    };

    let region = infer_region(Some(source_url));
    let rating = validate_rating(region, details.rating.as_deref());
    let pricecharting_id = record
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "NULL".to_string());

    let mut sql = String::new();
    let _ = write!(
        sql,
        "
DO $$
DECLARE
    product_id INTEGER;
BEGIN
    -- Insert into the products table with conflict handling
    INSERT INTO products (
        product_title,
        product_group,
        product_variant,
        release_year,
        product_type,
        region,
        publisher,
        developer,
        genre,
        image_url,
        ean_gtin,
        asin,
        epid,
        rating,
        pricecharting_id,
        pricecharting_url,
        created_at,
        products_updated_at
    ) VALUES (
        {title},
        {group},
        {variant},
        {year},
        {product_type},
        {region},
        {publisher},
        {developer},
        {genre},
        {image_url},
        {ean_gtin},
        {asin},
        {epid},
        {rating},
        {pricecharting_id},
        {url},
        NOW(),
        NOW()
    )
    ON CONFLICT (product_title, product_variant, product_group) DO {conflict}
    RETURNING id INTO product_id;

    -- Insert into the prices table (only if price is not null)
    IF FOUND THEN
",
        title = text_or_null(Some(product_name.as_str())),
        group = quote(PRODUCT_GROUP),
        variant = text_or_empty(Some(variant.as_str())),
        year = release_year(details.release_date.as_deref()),
        product_type = quote(product_type.as_str()),
        region = quote(region.as_str()),
        publisher = text_or_null(details.publisher.as_deref()),
        developer = text_or_null(details.developer.as_deref()),
        genre = text_or_null(genre),
        image_url = text_or_null(record.image_url.as_deref()),
        ean_gtin = text_array(details.ean_gtin.as_deref()),
        asin = text_array(details.asin.as_deref()),
        epid = text_array(details.epid.as_deref()),
        rating = text_or_null(rating.as_deref()),
        pricecharting_id = pricecharting_id,
        url = quote(source_url),
        conflict = if ignore_existing { "NOTHING" } else { UPDATE_CLAUSE },
    );

    let price_statements: Vec<String> = record
        .prices
        .iter()
        .filter_map(|(category, price)| (*price).map(|p| (category, p)))
        .map(|(category, price)| {
            format!(
                "
        INSERT INTO product_prices (product_id, price_type, price_usd, price_nok, price_nok_fixed, updated_at)
        VALUES (product_id, {}::price_type, {}, NULL, NULL, NOW());
",
                quote(category.as_str()),
                price
            )
        })
        .collect();

    if price_statements.is_empty() {
        sql.push_str("\n    -- No valid prices to insert.");
    } else {
        sql.push_str(&price_statements.join("\n"));
    }

    sql.push_str(
        "
    END IF;
END $$;

",
    );

    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PriceCategory;

    fn create_test_record() -> GameRecord {
        let mut record = GameRecord::new(12345);
        record.pricecharting_url =
            Some("https://www.pricecharting.com/game/xbox-360/tom-clancy's-hawx".to_string());
        record.product_name = Some("Tom Clancy's HAWX".to_string());
        record.prices.insert(PriceCategory::Loose, Some(5.99));
        record.prices.insert(PriceCategory::Complete, Some(12.0));
        record.details.genre = Some("Flight Simulator".to_string());
        record.details.release_date = Some("2009-03-03".to_string());
        record.details.publisher = Some("Ubisoft".to_string());
        record.details.upc = Some(vec!["008888176466".to_string()]);
        record.details.asin = Some(vec!["B001E7QC6Y".to_string(), "B0018X8ZS6".to_string()]);
        record.details.rating = Some("ESRB T".to_string());
        record
    }

    #[test]
    fn test_missing_url_is_error() {
        let mut record = create_test_record();
        record.pricecharting_url = None;
        let err = generate_sql_block(&record, false).unwrap_err();
        assert!(matches!(err, SqlError::MissingSourceUrl { .. }));
    }

    #[test]
    fn test_products_values() {
        let sql = generate_sql_block(&create_test_record(), false).unwrap();

        assert!(sql.starts_with("\nDO $$\n"));
        assert!(sql.contains("        'Tom Clancy''s HAWX',\n        'Xbox 360',\n        '',\n        2009,\n"));
        assert!(sql.contains("'Game',\n        'NTSC',\n        'Ubisoft',\n        NULL,\n        'Flight Simulator',"));
        assert!(sql.contains("ARRAY[]::text[],\n        ARRAY['B001E7QC6Y', 'B0018X8ZS6'],\n        ARRAY[]::text[],"));
        assert!(sql.contains("'ESRB T',\n        12345,\n"));
        assert!(sql.contains("DO UPDATE SET\n        release_year = EXCLUDED.release_year,"));
        assert!(sql.ends_with("    END IF;\nEND $$;\n\n"));
    }

    #[test]
    fn test_price_inserts_only_for_known_prices() {
        let sql = generate_sql_block(&create_test_record(), false).unwrap();
        assert_eq!(sql.matches("INSERT INTO product_prices").count(), 2);
        assert!(sql.contains("VALUES (product_id, 'loose'::price_type, 5.99, NULL, NULL, NOW());"));
        assert!(sql.contains("VALUES (product_id, 'complete'::price_type, 12, NULL, NULL, NOW());"));

        let mut record = create_test_record();
        record.prices.clear();
        let sql = generate_sql_block(&record, false).unwrap();
        assert!(sql.contains("-- No valid prices to insert."));
    }

    #[test]
    fn test_ignore_existing() {
        let sql = generate_sql_block(&create_test_record(), true).unwrap();
        assert!(sql.contains(
            "ON CONFLICT (product_title, product_variant, product_group) DO NOTHING\n"
        ));
        assert!(!sql.contains("EXCLUDED"));
    }

    #[test]
    fn test_rating_dropped_outside_region() {
        let mut record = create_test_record();
        record.details.rating = Some("PEGI 16".to_string());
        let sql = generate_sql_block(&record, false).unwrap();
        assert!(!sql.contains("PEGI"));
        assert!(sql.contains("ARRAY[]::text[],\n        NULL,\n        12345,"));
    }

    #[test]
    fn test_variant_from_bracket_suffix() {
        let mut record = create_test_record();
        record.product_name = Some("Halo 3 [Limited Edition]".to_string());
        let sql = generate_sql_block(&record, false).unwrap();
        assert!(sql.contains("        'Halo 3',\n        'Xbox 360',\n        'Limited Edition',\n"));
    }

    #[test]
    fn test_peripheral_clears_variant_and_genre() {
        let mut record = create_test_record();
        record.product_name = Some("Xbox 360 Wireless Controller".to_string());
        record.variant_name = Some("White".to_string());
        let sql = generate_sql_block(&record, false).unwrap();
        assert!(sql.contains("'Xbox 360 Wireless Controller',\n        'Xbox 360',\n        '',\n"));
        assert!(sql.contains("'Peripheral',\n        'NTSC',\n        'Ubisoft',\n        NULL,\n        NULL,\n"));
    }
}
