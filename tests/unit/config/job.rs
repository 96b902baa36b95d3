use super::*;

#[test]
fn empty_object_keeps_defaults() {
    let job = JobDescription::from_json_str("{}").unwrap();
    let base = PageSettings::default();
    assert_eq!(job.effective_settings(&base).unwrap(), base);
    assert_eq!(job.output_stem(), None);
}

#[test]
fn companion_tool_job_file_loads() {
    let s = r##"
{
  "created_at": "2025-01-02 03:04:05",
  "product_name": "Linen Shirt (Blue)",
  "layout": {
    "width": 1000,
    "top": 120,
    "gap": 80,
    "bottom": 120,
    "total_height": 4321,
    "background": "#FFFFFF"
  },
  "images": [
    {
      "index": 1,
      "original_filename": "a.png",
      "zip_filename": "images/image_001.jpg",
      "y": 120,
      "w": 1000,
      "h": 800,
      "layer_name": "IMAGE_001"
    }
  ],
  "outputs": { "detail_jpg": "x.jpg" }
}
"##;
    let job = JobDescription::from_json_str(s).unwrap();
    let settings = job.effective_settings(&PageSettings::default()).unwrap();
    assert_eq!(settings.layout.canvas_width, 1000.0);
    assert_eq!(settings.layout.top_margin, 120.0);
    assert_eq!(settings.layout.gap, 80.0);
    assert_eq!(settings.background, [255, 255, 255]);
    assert_eq!(job.output_stem().as_deref(), Some("Linen_Shirt_(Blue)"));

    let paths = job.image_paths(Path::new("job")).unwrap().unwrap();
    assert_eq!(paths, vec![Path::new("job").join("images/image_001.jpg")]);
}

#[test]
fn explicit_file_wins_over_packaged_names() {
    let img = JobImage {
        file: Some("raw/1.png".to_string()),
        zip_filename: Some("images/image_001.jpg".to_string()),
        original_filename: Some("1.png".to_string()),
    };
    assert_eq!(img.rel_path(), Some("raw/1.png"));

    let img = JobImage {
        original_filename: Some("1.png".to_string()),
        ..JobImage::default()
    };
    assert_eq!(img.rel_path(), Some("1.png"));
}

#[test]
fn image_without_name_is_a_config_error() {
    let job = JobDescription {
        images: vec![JobImage::default()],
        ..JobDescription::default()
    };
    let err = job.image_paths(Path::new(".")).unwrap_err();
    assert!(matches!(err, PageStackError::Config(_)));
}

#[test]
fn footer_block_toggles_footer() {
    let job = JobDescription::from_json_str(r#"{ "footer": { "enabled": false } }"#).unwrap();
    let settings = job.effective_settings(&PageSettings::default()).unwrap();
    assert!(settings.layout.active_footer().is_none());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = JobDescription::from_json_str("{ layout: ").unwrap_err();
    assert!(matches!(err, PageStackError::Serde(_)));

    let err = JobDescription::from_json_str(r#"{ "layout": { "gap": "wide" } }"#).unwrap_err();
    assert!(matches!(err, PageStackError::Serde(_)));
}

#[test]
fn missing_job_file_wraps_io_error() {
    let err = JobDescription::from_path("definitely/not/here/job.json").unwrap_err();
    assert!(matches!(err, PageStackError::Other(_)));
    assert!(err.to_string().contains("job.json"));
}

#[test]
fn safe_name_sanitizes() {
    assert_eq!(safe_name("  summer dress  "), "summer_dress");
    assert_eq!(safe_name("a/b:c*d"), "abcd");
    assert_eq!(safe_name("상품 1"), "상품_1");
    assert_eq!(safe_name("   "), DEFAULT_OUTPUT_STEM);
    assert_eq!(safe_name("!!!"), DEFAULT_OUTPUT_STEM);
    assert_eq!(safe_name(&"x".repeat(200)).chars().count(), 80);
}

#[test]
fn default_output_goes_to_its_own_folder() {
    let out = default_output_path(Path::new("shots"), "linen_shirt");
    assert_eq!(
        out,
        Path::new("shots").join("pagestack_out").join("linen_shirt.jpg")
    );
    assert_ne!(out.parent(), Some(Path::new("shots")));
}
