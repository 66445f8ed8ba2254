//! End-to-end tests: PNG on disk -> separation -> layer files on disk.

mod common;

use color_layers::OrderingPolicy;
use colorsep::models::AppConfig;
use colorsep::rendering::read_png;
use colorsep::services::{Manifest, SeparationPipeline};
use common::{colors, fixtures};
use pretty_assertions::assert_eq;

fn config(colors: usize, order: OrderingPolicy) -> AppConfig {
    let mut config = AppConfig::default();
    config.quantization.colors = colors;
    config.export_order = order;
    config
}

#[test]
fn test_largest_first_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures::write_png(dir.path(), "input.png", &fixtures::three_color_buffer());
    let out = dir.path().join("layers");

    let pipeline = SeparationPipeline::new(config(3, OrderingPolicy::LargestFirst)).unwrap();
    let summary = pipeline.process_file(&input, &out, None).unwrap();

    assert_eq!(
        common::file_names(&out),
        vec![
            "01_ff0000.png",
            "02_0000ff.png",
            "03_00a000.png",
            "color_info.txt",
            "layers.json",
            "quantized.png",
        ]
    );
    assert_eq!(summary.layers.len(), 3);

    common::assert_layer_file(&summary.layers[0], colors::RED, 8);
    common::assert_layer_file(&summary.layers[1], colors::BLUE, 5);
    common::assert_layer_file(&summary.layers[2], colors::GREEN, 2);

    let info = std::fs::read_to_string(&summary.color_info).unwrap();
    assert_eq!(
        info,
        "Layer 1: #ff0000 (8 pixels)\nLayer 2: #0000ff (5 pixels)\nLayer 3: #00a000 (2 pixels)\n"
    );
}

#[test]
fn test_smallest_first_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures::write_png(dir.path(), "input.png", &fixtures::three_color_buffer());
    let out = dir.path().join("out");

    let pipeline = SeparationPipeline::new(config(3, OrderingPolicy::SmallestFirst)).unwrap();
    let summary = pipeline.process_file(&input, &out, None).unwrap();

    let names: Vec<String> = summary
        .layers
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["01_00a000.png", "02_0000ff.png", "03_ff0000.png"]);
}

#[test]
fn test_quantized_image_matches_input_when_colors_suffice() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = fixtures::three_color_buffer();
    let input = fixtures::write_png(dir.path(), "input.png", &buffer);

    let pipeline = SeparationPipeline::new(config(8, OrderingPolicy::LargestFirst)).unwrap();
    let summary = pipeline.process_file(&input, &dir.path().join("out"), None).unwrap();

    common::assert_png_file(&summary.quantized);
    assert_eq!(read_png(&summary.quantized).unwrap(), buffer);
}

#[test]
fn test_requantizing_exported_image_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures::write_png(dir.path(), "input.png", &fixtures::gradient_buffer(24, 6));
    let pipeline = SeparationPipeline::new(config(4, OrderingPolicy::LargestFirst)).unwrap();

    let first = pipeline.process_file(&input, &dir.path().join("first"), None).unwrap();
    let second = pipeline
        .process_file(&first.quantized, &dir.path().join("second"), None)
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&first.color_info).unwrap(),
        std::fs::read_to_string(&second.color_info).unwrap()
    );
    assert_eq!(
        read_png(&first.quantized).unwrap(),
        read_png(&second.quantized).unwrap()
    );
}

#[test]
fn test_manifest_contents() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures::write_png(dir.path(), "input.png", &fixtures::three_color_buffer());
    let pipeline = SeparationPipeline::new(config(3, OrderingPolicy::LargestFirst)).unwrap();
    let summary = pipeline.process_file(&input, &dir.path().join("out"), None).unwrap();

    let path = summary.manifest.expect("manifest enabled by default");
    let manifest: Manifest = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();

    assert_eq!((manifest.width, manifest.height), (4, 4));
    assert_eq!(manifest.order, OrderingPolicy::LargestFirst);
    assert!(manifest.converged);
    let files: Vec<&str> = manifest.layers.iter().map(|l| l.file.as_str()).collect();
    assert_eq!(files, vec!["01_ff0000.png", "02_0000ff.png", "03_00a000.png"]);
    let coverage: usize = manifest.layers.iter().map(|l| l.coverage).sum();
    assert_eq!(coverage, 15);
}

#[test]
fn test_manifest_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures::write_png(dir.path(), "input.png", &fixtures::three_color_buffer());
    let mut config = config(3, OrderingPolicy::LargestFirst);
    config.export.manifest = false;

    let out = dir.path().join("out");
    let summary = SeparationPipeline::new(config)
        .unwrap()
        .process_file(&input, &out, None)
        .unwrap();

    assert!(summary.manifest.is_none());
    assert!(!out.join("layers.json").exists());
}

#[test]
fn test_optimized_export_decodes_identically() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures::write_png(dir.path(), "input.png", &fixtures::three_color_buffer());
    let mut config = config(3, OrderingPolicy::LargestFirst);
    config.export.optimize_png = true;

    let summary = SeparationPipeline::new(config)
        .unwrap()
        .process_file(&input, &dir.path().join("out"), None)
        .unwrap();

    assert_eq!(read_png(&summary.quantized).unwrap(), fixtures::three_color_buffer());
    common::assert_layer_file(&summary.layers[0], colors::RED, 8);
}

#[test]
fn test_fully_transparent_input_exports_no_layers() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = color_layers::PixelBuffer::filled(3, 2, colors::CLEAR).unwrap();
    let input = fixtures::write_png(dir.path(), "input.png", &buffer);
    let out = dir.path().join("out");

    let summary = SeparationPipeline::new(AppConfig::default())
        .unwrap()
        .process_file(&input, &out, None)
        .unwrap();

    assert!(summary.layers.is_empty());
    assert_eq!(
        common::file_names(&out),
        vec!["color_info.txt", "layers.json", "quantized.png"]
    );
    assert_eq!(std::fs::read_to_string(&summary.color_info).unwrap(), "");
}

#[test]
fn test_resize_before_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures::write_png(dir.path(), "input.png", &fixtures::gradient_buffer(40, 20));
    let mut config = config(3, OrderingPolicy::LargestFirst);
    config.resize.enabled = true;
    config.resize.width = 10;
    config.resize.height = 5;

    let summary = SeparationPipeline::new(config)
        .unwrap()
        .process_file(&input, &dir.path().join("out"), None)
        .unwrap();

    let quantized = read_png(&summary.quantized).unwrap();
    assert_eq!((quantized.width(), quantized.height()), (10, 5));
    assert!(summary.layers.len() <= 3);
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = SeparationPipeline::new(AppConfig::default()).unwrap();
    let result = pipeline.process_file(&dir.path().join("nope.png"), &dir.path().join("out"), None);
    assert!(result.is_err());
}
