//! Tests for scanning element directories into a catalog

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::Path;
    use tilemosaic::MosaicError;
    use tilemosaic::catalog::builder::{CatalogBuilder, list_element_files};
    use tilemosaic::io::configuration::{DecodePolicy, MosaicConfig};

    fn write_solid(dir: &Path, name: &str, size: u32, color: [u8; 3]) {
        let saved = RgbImage::from_pixel(size, size, Rgb(color)).save(dir.join(name));
        assert!(saved.is_ok(), "fixture {name} should be written");
    }

    fn small_config(decode_policy: DecodePolicy) -> MosaicConfig {
        MosaicConfig {
            output_size: 32,
            tile_size: 8,
            chunk_size: 16,
            decode_policy,
            ..MosaicConfig::default()
        }
    }

    // Tests elements are resized to tile size and averaged
    #[test]
    fn test_build_resizes_and_averages() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir available");
        };
        write_solid(dir.path(), "red.png", 40, [255, 0, 0]);
        write_solid(dir.path(), "blue.png", 8, [0, 0, 255]);

        let config = small_config(DecodePolicy::Skip);
        let Ok(outcome) = CatalogBuilder::new(&config).build(dir.path()) else {
            unreachable!("two valid elements build a catalog");
        };

        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.catalog.len(), 2);
        for element in outcome.catalog.elements() {
            assert_eq!(element.pixel_block.dimensions(), (8, 8));
        }
        let colors = outcome.catalog.colors();
        assert!(colors.contains(&Rgb([255, 0, 0])));
        assert!(colors.contains(&Rgb([0, 0, 255])));
    }

    // Tests undecodable files are skipped with the skip policy
    // Verified by treating skip as abort
    #[test]
    fn test_skip_policy_leaves_out_broken_files() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir available");
        };
        write_solid(dir.path(), "green.png", 8, [0, 255, 0]);
        assert!(fs::write(dir.path().join("broken.png"), b"not an image").is_ok());

        let config = small_config(DecodePolicy::Skip);
        let Ok(outcome) = CatalogBuilder::new(&config).build(dir.path()) else {
            unreachable!("one valid element builds a catalog");
        };

        assert_eq!(outcome.catalog.len(), 1);
        assert_eq!(outcome.skipped, vec![dir.path().join("broken.png")]);
    }

    // Tests undecodable files abort the build with the abort policy
    #[test]
    fn test_abort_policy_fails_on_broken_file() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir available");
        };
        write_solid(dir.path(), "green.png", 8, [0, 255, 0]);
        assert!(fs::write(dir.path().join("broken.png"), b"not an image").is_ok());

        let config = small_config(DecodePolicy::Abort);
        let result = CatalogBuilder::new(&config).build(dir.path());

        match result {
            Err(MosaicError::ElementDecode { path, .. }) => {
                assert_eq!(path, dir.path().join("broken.png"));
            }
            _ => unreachable!("Expected ElementDecode error type"),
        }
    }

    // Tests the abort policy reports the earliest broken file in path order
    // Verified by returning whichever decode failure finishes first
    #[test]
    fn test_abort_policy_reports_first_broken_file() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir available");
        };
        for i in 0..6 {
            write_solid(dir.path(), &format!("m{i}.png"), 8, [i * 40, 0, 0]);
        }
        assert!(fs::write(dir.path().join("b_broken.png"), b"junk").is_ok());
        assert!(fs::write(dir.path().join("z_broken.png"), b"junk").is_ok());

        let config = small_config(DecodePolicy::Abort);
        for _ in 0..4 {
            match CatalogBuilder::new(&config).build(dir.path()) {
                Err(MosaicError::ElementDecode { path, .. }) => {
                    assert_eq!(path, dir.path().join("b_broken.png"));
                }
                _ => unreachable!("Expected ElementDecode error type"),
            }
        }
    }

    // Tests an empty directory yields CatalogEmpty
    #[test]
    fn test_empty_directory() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir available");
        };

        let config = small_config(DecodePolicy::Skip);
        let result = CatalogBuilder::new(&config).build(dir.path());

        assert!(matches!(result, Err(MosaicError::CatalogEmpty { .. })));
    }

    // Tests a directory of only broken files yields CatalogEmpty with a skip count
    #[test]
    fn test_only_broken_files() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir available");
        };
        assert!(fs::write(dir.path().join("a.png"), b"junk").is_ok());
        assert!(fs::write(dir.path().join("b.jpg"), b"junk").is_ok());

        let config = small_config(DecodePolicy::Skip);
        let result = CatalogBuilder::new(&config).build(dir.path());

        match result {
            Err(MosaicError::CatalogEmpty { skipped, .. }) => assert_eq!(skipped, 2),
            _ => unreachable!("Expected CatalogEmpty error type"),
        }
    }

    // Tests a missing directory is a file system error
    #[test]
    fn test_missing_directory() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir available");
        };

        let result = list_element_files(&dir.path().join("missing"));

        assert!(matches!(result, Err(MosaicError::FileSystem { .. })));
    }

    // Tests subdirectories are ignored and files come back sorted
    #[test]
    fn test_list_element_files_sorted_regular_files() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir available");
        };
        write_solid(dir.path(), "c.png", 2, [0, 0, 0]);
        write_solid(dir.path(), "a.png", 2, [0, 0, 0]);
        assert!(fs::create_dir(dir.path().join("b_dir")).is_ok());

        let Ok(files) = list_element_files(dir.path()) else {
            unreachable!("temp dir is readable");
        };

        assert_eq!(files, vec![dir.path().join("a.png"), dir.path().join("c.png")]);
    }

    // Tests repeated builds produce the same catalog order
    #[test]
    fn test_build_is_deterministic() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temp dir available");
        };
        for (i, color) in [[9, 9, 9], [200, 1, 1], [9, 9, 9], [0, 100, 0]].iter().enumerate() {
            write_solid(dir.path(), &format!("e{i}.png"), 8, *color);
        }

        let config = small_config(DecodePolicy::Skip);
        let first = CatalogBuilder::new(&config).build(dir.path());
        let second = CatalogBuilder::new(&config).build(dir.path());

        match (first, second) {
            (Ok(a), Ok(b)) => assert_eq!(a.catalog.elements(), b.catalog.elements()),
            _ => unreachable!("both builds succeed"),
        }
    }
}
