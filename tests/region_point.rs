use salience::{Analyzer, CropOptions, PixelBuffer};

fn uniform_gray(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_rgb(vec![128u8; width * height * 3], width, height).unwrap()
}

fn scene_with_square(
    width: usize,
    height: usize,
    x0: usize,
    y0: usize,
    size: usize,
) -> PixelBuffer {
    let mut data = vec![25u8; width * height * 3];
    for y in y0..y0 + size {
        for x in x0..x0 + size {
            let idx = (y * width + x) * 3;
            data[idx] = 245;
            data[idx + 1] = 240;
            data[idx + 2] = 230;
        }
    }
    PixelBuffer::from_rgb(data, width, height).unwrap()
}

fn textured(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let v = (((x * 31) ^ (y * 17)) & 0xFF) as u8;
            data.extend_from_slice(&[v, v.wrapping_add(60), v.wrapping_mul(2)]);
        }
    }
    PixelBuffer::from_rgb(data, width, height).unwrap()
}

#[test]
fn uniform_image_region_is_the_full_frame() {
    let analyzer = Analyzer::default();
    let region = analyzer.region(&uniform_gray(599, 495), None);
    assert_eq!(region.top, 0);
    assert_eq!(region.left, 0);
    assert_eq!(region.bottom, 495);
    assert_eq!(region.right, 599);
}

#[test]
fn uniform_image_point_is_the_geometric_center() {
    let analyzer = Analyzer::default();
    let point = analyzer.point(&uniform_gray(599, 495));
    assert_eq!((point.x, point.y), (299, 247));
}

#[test]
fn point_lands_inside_a_bright_square() {
    let analyzer = Analyzer::default();
    let buf = scene_with_square(200, 150, 130, 30, 24);
    let point = analyzer.point(&buf);
    assert!(
        point.x >= 120 && point.x <= 164,
        "x = {} outside the square's reach",
        point.x
    );
    assert!(
        point.y >= 20 && point.y <= 64,
        "y = {} outside the square's reach",
        point.y
    );
}

#[test]
fn unconstrained_region_contains_the_bright_square() {
    let analyzer = Analyzer::default();
    let buf = scene_with_square(240, 180, 170, 40, 30);
    let region = analyzer.region(&buf, None);
    assert!(region.left <= 170, "left = {}", region.left);
    assert!(region.right >= 200, "right = {}", region.right);
    assert!(region.top <= 40, "top = {}", region.top);
    assert!(region.bottom >= 70, "bottom = {}", region.bottom);
}

#[test]
fn region_bounds_stay_inside_the_source() {
    let analyzer = Analyzer::default();
    for buf in [textured(777, 333), textured(64, 512), textured(2, 2)] {
        let region = analyzer.region(&buf, None);
        assert!(region.top < region.bottom);
        assert!(region.left < region.right);
        assert!(region.bottom <= buf.height());
        assert!(region.right <= buf.width());

        let point = analyzer.point(&buf);
        assert!(point.x < buf.width());
        assert!(point.y < buf.height());
    }
}

#[test]
fn exact_crop_returns_the_requested_size() {
    let analyzer = Analyzer::default();
    let buf = scene_with_square(400, 300, 60, 200, 40);
    let opts = CropOptions::exact(120, 90).unwrap();
    let region = analyzer.region(&buf, Some(&opts));
    assert_eq!(region.width(), 120);
    assert_eq!(region.height(), 90);
    assert!(region.right <= 400 && region.bottom <= 300);
    assert!(region.left <= 80 && region.right >= 80, "{region:?}");
    assert!(region.top <= 220 && region.bottom >= 220, "{region:?}");
}

#[test]
fn aspect_crop_matches_the_requested_ratio() {
    let analyzer = Analyzer::default();
    let buf = textured(640, 480);
    let opts = CropOptions::aspect(16.0 / 9.0).unwrap();
    let region = analyzer.region(&buf, Some(&opts));
    assert_eq!(region.width(), 640);
    assert_eq!(region.height(), 360);
    assert!(region.bottom <= 480);
}

#[test]
fn oversized_crop_clamps_to_the_full_frame() {
    let analyzer = Analyzer::default();
    let buf = textured(100, 80);
    let opts = CropOptions::exact(1000, 800).unwrap();
    let region = analyzer.region(&buf, Some(&opts));
    assert_eq!((region.top, region.left), (0, 0));
    assert_eq!((region.bottom, region.right), (80, 100));
}

#[test]
fn repeated_extractions_are_identical_modulo_duration() {
    let analyzer = Analyzer::default();
    let buf = textured(350, 250);
    let opts = CropOptions::exact(100, 100).unwrap();

    let a = analyzer.region(&buf, Some(&opts));
    let b = analyzer.region(&buf, Some(&opts));
    assert_eq!((a.top, a.left, a.bottom, a.right), (b.top, b.left, b.bottom, b.right));

    let pa = analyzer.point(&buf);
    let pb = analyzer.point(&buf);
    assert_eq!((pa.x, pa.y), (pb.x, pb.y));
}
