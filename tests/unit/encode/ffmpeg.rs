use super::*;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps { num: 60, den: 1 },
    }
}

#[test]
fn odd_dimensions_are_rejected() {
    assert!(validate_config(&cfg(320, 320)).is_ok());
    assert!(validate_config(&cfg(321, 320)).is_err());
    assert!(validate_config(&cfg(320, 0)).is_err());
}

#[test]
fn zero_fps_is_rejected() {
    let mut c = cfg(2, 2);
    c.fps.den = 0;
    assert!(validate_config(&c).is_err());
}

#[test]
fn args_describe_raw_rgba_input_and_h264_output() {
    let mut c = cfg(640, 480);
    c.fps = Fps {
        num: 30000,
        den: 1001,
    };
    let args: Vec<String> = encoder_args(&c, Path::new("out/grid.mp4"))
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    let at = |flag: &str| args.iter().position(|a| a == flag).unwrap();
    assert_eq!(args[0], "-y");
    assert_eq!(args[at("-s") + 1], "640x480");
    assert_eq!(args[at("-r") + 1], "30000/1001");
    assert!(at("-r") < at("-i"));
    assert_eq!(args[at("-i") + 1], "pipe:0");
    assert_eq!(args[at("-c:v") + 1], "libx264");
    assert_eq!(args.last().map(String::as_str), Some("out/grid.mp4"));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4", Rgba8::rgb(0, 0, 0)));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn invalid_size_fails_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4", Rgba8::rgb(0, 0, 0)));
    assert!(sink.begin(cfg(3, 4)).is_err());
    assert!(sink.end().is_err());
}
