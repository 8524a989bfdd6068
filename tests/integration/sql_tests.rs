//! Record files to SQL script

use pricecharting_scraper::sql::{convert_files, OUTPUT_HEADER};
use pricecharting_scraper::{GameRecord, PriceCategory};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_record(dir: &Path, name: &str, record: &GameRecord) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(record).unwrap()).unwrap();
    path
}

fn kinect_sports() -> GameRecord {
    let mut record = GameRecord::new(4242);
    record.pricecharting_url =
        Some("https://www.pricecharting.com/game/pal-xbox-360/kinect-sports".to_string());
    record.product_name = Some("Kinect Sports [Platinum Hits]".to_string());
    record.prices.insert(PriceCategory::Loose, Some(4.5));
    record.details.release_date = Some("2010-11-04".to_string());
    record.details.rating = Some("PEGI 12".to_string());
    record
}

fn wireless_controller() -> GameRecord {
    let mut record = GameRecord::new(77);
    record.pricecharting_url =
        Some("https://www.pricecharting.com/game/jp-xbox-360/wireless-controller".to_string());
    record.product_name = Some("Wireless Controller".to_string());
    record.details.genre = Some("Accessories".to_string());
    record.details.rating = Some("PEGI 3".to_string());
    record
}

#[test]
fn test_convert_multiple_files() {
    let dir = TempDir::new().unwrap();
    let game = write_record(dir.path(), "4242.json", &kinect_sports());
    let controller = write_record(dir.path(), "77.json", &wireless_controller());
    let output = dir.path().join("insert.txt");

    let summary = convert_files(&[game.clone(), controller.clone()], &output, false).unwrap();
    assert_eq!(summary.converted, vec![game.clone(), controller.clone()]);
    assert!(summary.failed.is_empty());

    let sql = std::fs::read_to_string(&output).unwrap();
    assert!(sql.starts_with(OUTPUT_HEADER));
    assert_eq!(sql.matches("DO $$").count(), 2);

    let game_pos = sql.find(&format!("-- Processing {}", game.display())).unwrap();
    let controller_pos = sql
        .find(&format!("-- Processing {}", controller.display()))
        .unwrap();
    assert!(game_pos < controller_pos);

    let (game_block, controller_block) = sql.split_at(controller_pos);

    assert!(game_block.contains("'Kinect Sports'"));
    assert!(game_block.contains("'Platinum Hits'"));
    assert!(game_block.contains("'PAL'"));
    assert!(game_block.contains("'PEGI 12'"));
    assert!(game_block.contains("2010,"));
    assert!(game_block.contains("'loose'::price_type, 4.5"));
    assert!(game_block.contains("DO UPDATE"));

    assert!(controller_block.contains("'Peripheral'"));
    assert!(controller_block.contains("'NTSC-J'"));
    assert!(!controller_block.contains("'Accessories'"));
    assert!(!controller_block.contains("'PEGI 3'"));
    assert!(controller_block.contains("-- No valid prices to insert."));
}

#[test]
fn test_ignore_existing() {
    let dir = TempDir::new().unwrap();
    let game = write_record(dir.path(), "4242.json", &kinect_sports());
    let output = dir.path().join("insert.txt");

    convert_files(&[game], &output, true).unwrap();

    let sql = std::fs::read_to_string(&output).unwrap();
    assert!(sql.contains("DO NOTHING"));
    assert!(!sql.contains("DO UPDATE"));
}

#[test]
fn test_bad_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    let mut no_url = kinect_sports();
    no_url.pricecharting_url = None;
    let no_url = write_record(dir.path(), "no_url.json", &no_url);
    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "not json").unwrap();
    let missing = dir.path().join("missing.json");
    let good = write_record(dir.path(), "4242.json", &kinect_sports());
    let output = dir.path().join("insert.txt");

    let summary = convert_files(
        &[no_url.clone(), garbage.clone(), missing.clone(), good.clone()],
        &output,
        false,
    )
    .unwrap();

    assert_eq!(summary.converted, vec![good]);
    assert_eq!(summary.failed, vec![no_url.clone(), garbage, missing]);

    let sql = std::fs::read_to_string(&output).unwrap();
    assert_eq!(sql.matches("-- Processing").count(), 1);
    assert!(!sql.contains(&no_url.display().to_string()));
}

#[test]
fn test_output_recreated() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("insert.txt");
    std::fs::write(&output, "stale content").unwrap();

    let summary = convert_files(&[], &output, false).unwrap();
    assert!(summary.converted.is_empty());

    let sql = std::fs::read_to_string(&output).unwrap();
    assert_eq!(sql, format!("{}\n\n", OUTPUT_HEADER));
}
