use super::*;
use crate::foundation::core::Fps;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tixel-png-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

#[test]
fn sequence_files_are_numbered_by_push_order() {
    let dir = scratch_dir("seq");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 3,
        height: 2,
        fps: Fps::new(60, 1).unwrap(),
    })
    .unwrap();
    sink.push_frame(FrameIndex(4), &solid(3, 2, [10, 20, 30, 255])).unwrap();
    sink.push_frame(FrameIndex(9), &solid(3, 2, [40, 50, 60, 255])).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.written(), 2);

    let img = image::open(dir.join("frame_00001.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [40, 50, 60, 255]);
    assert!(dir.join("frame_00000.png").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn mismatched_frame_is_rejected() {
    let dir = scratch_dir("mismatch");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(60, 1).unwrap(),
    })
    .unwrap();
    assert!(sink.push_frame(FrameIndex(0), &solid(4, 2, [0; 4])).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn single_png_is_unpremultiplied() {
    let dir = scratch_dir("single");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("one.png");
    write_png(&path, &solid(1, 1, [64, 0, 0, 128])).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [128, 0, 0, 128]);
    let _ = std::fs::remove_dir_all(&dir);
}
