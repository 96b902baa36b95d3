use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "pagestack_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32) {
    image::RgbImage::from_pixel(w, h, image::Rgb([1, 2, 3]))
        .save(path)
        .unwrap();
}

#[test]
fn extension_filter_ignores_case() {
    assert!(is_image_path(Path::new("a.JPG")));
    assert!(is_image_path(Path::new("dir/b.jpeg")));
    assert!(is_image_path(Path::new("c.Tiff")));
    assert!(!is_image_path(Path::new("notes.txt")));
    assert!(!is_image_path(Path::new("no_extension")));
}

#[test]
fn collect_images_filters_and_sorts_case_insensitively() {
    let dir = temp_dir("collect");
    std::fs::create_dir_all(dir.join("nested.png")).unwrap();
    write_png(&dir.join("B.png"), 2, 2);
    write_png(&dir.join("a.PNG"), 2, 2);
    write_png(&dir.join("c.png"), 2, 2);
    std::fs::write(dir.join("readme.txt"), "not an image").unwrap();

    let files = collect_images(&dir).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.PNG", "B.png", "c.png"]);
}

#[test]
fn collect_images_missing_dir_errors() {
    let err = collect_images(&temp_dir("missing")).unwrap_err();
    assert!(matches!(err, PageStackError::Other(_)));
}

#[test]
fn header_probe_reads_dimensions() {
    let dir = temp_dir("probe");
    std::fs::create_dir_all(&dir).unwrap();
    let p = dir.join("wide.png");
    write_png(&p, 40, 10);

    let size = HeaderProbe.image_size(&p).unwrap();
    assert_eq!(size, ImageSize::from_pixels(40, 10));

    let missing = dir.join("missing.png");
    let err = HeaderProbe.image_size(&missing).unwrap_err();
    assert!(err.to_string().contains("missing.png"));
}

#[test]
fn probe_all_preserves_order_and_stops_on_error() {
    let mut known = HashMap::new();
    known.insert(PathBuf::from("x"), ImageSize::from_pixels(10, 20));
    known.insert(PathBuf::from("y"), ImageSize::from_pixels(30, 40));

    let sizes = probe_all(&known, &[PathBuf::from("y"), PathBuf::from("x")]).unwrap();
    assert_eq!(
        sizes,
        vec![ImageSize::from_pixels(30, 40), ImageSize::from_pixels(10, 20)]
    );

    assert!(probe_all(&known, &[PathBuf::from("x"), PathBuf::from("z")]).is_err());
}

#[test]
fn output_path_must_not_be_a_source() {
    let dir = temp_dir("clobber");
    std::fs::create_dir_all(&dir).unwrap();
    let a = dir.join("01.jpg");
    let b = dir.join("02.jpg");
    write_png(&a, 2, 2);
    write_png(&b, 2, 2);
    let sources = vec![a.clone(), b];

    let err = check_output_path(&a, &sources).unwrap_err();
    assert!(err.is_invalid_input());
    assert!(err.to_string().contains("01.jpg"));

    // same file reached through a different spelling
    let dotted = dir.join(".").join("01.jpg");
    assert!(check_output_path(&dotted, &sources).is_err());

    check_output_path(&dir.join("page.jpg"), &sources).unwrap();
    check_output_path(&dir.join("out").join("01.jpg"), &sources).unwrap();
}

#[test]
fn default_output_folder_is_not_scanned() {
    let dir = temp_dir("default_out");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("01.png"), 2, 2);

    let out = crate::config::job::default_output_path(&dir, "01");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();
    write_png(&out.with_extension("png"), 2, 2);

    let files = collect_images(&dir).unwrap();
    assert_eq!(files, vec![dir.join("01.png")]);
}
