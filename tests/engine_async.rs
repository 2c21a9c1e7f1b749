#![cfg(feature = "engine")]

use std::path::{Path, PathBuf};

use salience::{
    AnalysisConfig, Analyzer, CropOptions, Decoder, Engine, EngineConfig, ImageSource, PixelBuffer,
    SalienceError, SalienceResult,
};

fn textured(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let v = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8;
            data.extend_from_slice(&[v, v.wrapping_mul(3), v.wrapping_add(91)]);
        }
    }
    PixelBuffer::from_rgb(data, width, height).unwrap()
}

fn uniform_gray(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_rgb(vec![128u8; width * height * 3], width, height).unwrap()
}

#[tokio::test]
async fn engine_matches_direct_analysis() {
    let engine = Engine::new();
    let analyzer = Analyzer::default();
    let buf = textured(200, 150);

    let point = engine.point(buf.clone()).await.unwrap();
    let direct = analyzer.point(&buf);
    assert_eq!((point.x, point.y), (direct.x, direct.y));

    let opts = CropOptions::exact(64, 48).unwrap();
    let region = engine.region(buf.clone(), Some(opts)).await.unwrap();
    let direct = analyzer.region(&buf, Some(&opts));
    assert_eq!(
        (region.top, region.left, region.bottom, region.right),
        (direct.top, direct.left, direct.bottom, direct.right)
    );

    let palette = engine.palette(buf, 8).await.unwrap();
    assert_eq!(palette.swatches.len(), 8);
}

#[tokio::test]
async fn uniform_image_fallbacks_flow_through_the_engine() {
    let engine = Engine::new();

    let region = engine.region(uniform_gray(599, 495), None).await.unwrap();
    assert_eq!(
        (region.top, region.left, region.bottom, region.right),
        (0, 0, 495, 599)
    );

    let point = engine.point(uniform_gray(599, 495)).await.unwrap();
    assert_eq!((point.x, point.y), (299, 247));

    let palette = engine.palette(uniform_gray(599, 495), 1).await.unwrap();
    assert_eq!(palette.swatches[0].css(), "#808080");
}

#[tokio::test]
async fn out_of_range_swatch_counts_are_rejected_before_analysis() {
    let engine = Engine::new();
    let buf = uniform_gray(4, 4);

    let err = engine.palette(buf.clone(), 0).await.err().unwrap();
    assert_eq!(err, SalienceError::SwatchCountOutOfRange { requested: 0 });
    assert!(err.is_input_error());

    let err = engine.palette(buf, 4097).await.err().unwrap();
    assert_eq!(err, SalienceError::SwatchCountOutOfRange { requested: 4097 });
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_calls_complete_independently() {
    let engine = Engine::with_config(EngineConfig {
        workers: 2,
        queue_depth: 2,
        analysis: AnalysisConfig::default(),
    });

    let (r1, r2, p1, p2, pal) = tokio::join!(
        engine.region(textured(150, 100), None),
        engine.region(uniform_gray(80, 60), None),
        engine.point(textured(90, 120)),
        engine.point(uniform_gray(64, 64)),
        engine.palette(textured(128, 128), 4),
    );

    assert!(r1.is_ok() && r2.is_ok());
    let p2 = p2.unwrap();
    assert_eq!((p2.x, p2.y), (32, 32));
    assert!(p1.is_ok());
    assert_eq!(pal.unwrap().swatches.len(), 4);

    let full = r2.unwrap();
    assert_eq!((full.bottom, full.right), (60, 80));
}

#[tokio::test]
async fn queue_backpressure_still_serves_every_job() {
    // One worker and a single-slot queue force submissions to wait.
    let engine = Engine::with_config(EngineConfig {
        workers: 1,
        queue_depth: 1,
        analysis: AnalysisConfig::default(),
    });

    let (a, b, c, d, e, f) = tokio::join!(
        engine.point(uniform_gray(32, 32)),
        engine.point(uniform_gray(32, 32)),
        engine.point(uniform_gray(32, 32)),
        engine.point(uniform_gray(32, 32)),
        engine.point(uniform_gray(32, 32)),
        engine.point(uniform_gray(32, 32)),
    );
    for point in [a, b, c, d, e, f] {
        let point = point.unwrap();
        assert_eq!((point.x, point.y), (16, 16));
    }
}

struct FixedDecoder;

impl Decoder for FixedDecoder {
    fn decode_path(&self, _path: &Path) -> SalienceResult<PixelBuffer> {
        PixelBuffer::from_rgb(vec![128u8; 64 * 48 * 3], 64, 48)
    }

    fn decode_bytes(&self, _bytes: &[u8]) -> SalienceResult<PixelBuffer> {
        PixelBuffer::from_rgb(vec![200u8; 16 * 16 * 3], 16, 16)
    }
}

#[tokio::test]
async fn custom_decoders_are_injectable() {
    let engine = Engine::with_decoder(EngineConfig::default(), FixedDecoder);

    let point = engine
        .point(PathBuf::from("ignored-by-the-stub.png"))
        .await
        .unwrap();
    assert_eq!((point.x, point.y), (32, 24));

    let palette = engine.palette(vec![1u8, 2, 3], 1).await.unwrap();
    assert_eq!(palette.swatches[0].css(), "#c8c8c8");
}

struct RefusingDecoder;

impl Decoder for RefusingDecoder {
    fn decode_path(&self, _path: &Path) -> SalienceResult<PixelBuffer> {
        Err(SalienceError::Decode {
            reason: "refused".to_string(),
        })
    }

    fn decode_bytes(&self, _bytes: &[u8]) -> SalienceResult<PixelBuffer> {
        Err(SalienceError::Decode {
            reason: "refused".to_string(),
        })
    }
}

#[tokio::test]
async fn decode_failures_surface_to_the_caller() {
    let engine = Engine::with_decoder(EngineConfig::default(), RefusingDecoder);

    let err = engine.point(PathBuf::from("whatever.png")).await.err().unwrap();
    assert!(err.is_decode_error());
    assert_eq!(
        err,
        SalienceError::Decode {
            reason: "refused".to_string(),
        }
    );

    // Decode errors affect only their own call.
    let ok = engine.point(uniform_gray(10, 10)).await;
    assert!(ok.is_ok());
}

#[tokio::test]
async fn malformed_bytes_report_decode_errors() {
    let engine = Engine::new();
    let err = engine
        .point(ImageSource::Buffer(b"not an image at all".to_vec()))
        .await
        .err()
        .unwrap();
    assert!(err.is_decode_error(), "{err:?}");
}
