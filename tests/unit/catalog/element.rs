//! Tests for element construction and catalog ordering

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use std::path::{Path, PathBuf};
    use tilemosaic::MosaicError;
    use tilemosaic::catalog::element::{Catalog, Element};

    fn solid(path: &str, size: u32, color: [u8; 3]) -> Element {
        let Ok(element) = Element::from_block(path, RgbImage::from_pixel(size, size, Rgb(color)))
        else {
            unreachable!("non-empty block always yields an element");
        };
        element
    }

    // Tests representative color is the truncated block mean
    // Verified by rounding the mean instead of truncating
    #[test]
    fn test_representative_color_truncates() {
        let mut block = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        block.put_pixel(0, 0, Rgb([3, 7, 255]));

        let Ok(element) = Element::from_block("a.png", block) else {
            unreachable!("non-empty block always yields an element");
        };

        assert_eq!(element.representative_color, Rgb([0, 1, 63]));
        assert_eq!(element.pixel_block.dimensions(), (2, 2));
        assert_eq!(element.path, PathBuf::from("a.png"));
    }

    // Tests an empty block is rejected
    #[test]
    fn test_empty_block_rejected() {
        let result = Element::from_block("empty.png", RgbImage::new(0, 0));

        assert!(matches!(
            result,
            Err(MosaicError::InvalidParameter { .. })
        ));
    }

    // Tests an empty catalog is an error naming the directory
    #[test]
    fn test_empty_catalog_rejected() {
        let result = Catalog::new(Vec::new(), 16, Path::new("elements"), 3);

        match result {
            Err(MosaicError::CatalogEmpty { directory, skipped }) => {
                assert_eq!(directory, PathBuf::from("elements"));
                assert_eq!(skipped, 3);
            }
            _ => unreachable!("Expected CatalogEmpty error type"),
        }
    }

    // Tests blocks of the wrong size are rejected
    #[test]
    fn test_wrong_block_size_rejected() {
        let elements = vec![solid("a.png", 16, [1, 2, 3]), solid("b.png", 8, [4, 5, 6])];

        let result = Catalog::new(elements, 16, Path::new("elements"), 0);

        assert!(matches!(
            result,
            Err(MosaicError::InvalidParameter { .. })
        ));
    }

    // Tests catalog order is by color, then by path
    // Verified by removing the path tie-break
    #[test]
    fn test_catalog_sorted_by_color_then_path() {
        let elements = vec![
            solid("z.png", 4, [200, 0, 0]),
            solid("b.png", 4, [10, 10, 10]),
            solid("a.png", 4, [10, 10, 10]),
            solid("m.png", 4, [0, 255, 0]),
        ];

        let Ok(catalog) = Catalog::new(elements, 4, Path::new("elements"), 0) else {
            unreachable!("valid elements always form a catalog");
        };

        let paths: Vec<&Path> = catalog.elements().iter().map(|e| e.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("m.png"),
                Path::new("a.png"),
                Path::new("b.png"),
                Path::new("z.png")
            ]
        );
        assert_eq!(catalog.len(), 4);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.tile_size(), 4);
        assert_eq!(catalog.colors().first(), Some(&Rgb([0, 255, 0])));
        assert!(catalog.get(4).is_none());
    }
}
