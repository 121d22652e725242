use dxf_ngin::{
    Rgb,
    color::{contrast_ratio, darken, hls_to_rgb, lighten, luminance, rgb_to_hls},
};

fn approx(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

#[test]
fn should_unpack_and_repack_colors() {
    let color = Rgb::from_packed(0x336699);
    assert_eq!(color, Rgb::new(0x33, 0x66, 0x99));
    assert_eq!(color.to_packed(), 0x336699);
    assert_eq!(color.to_string(), "#336699");
    assert_eq!(Rgb::from_packed(0xFFFFFF), Rgb::WHITE);
}

#[test]
fn should_compute_relative_luminance() {
    assert!(approx(luminance(Rgb::WHITE), 1.0, 1e-9));
    assert!(approx(luminance(Rgb::BLACK), 0.0, 1e-9));
    assert!(approx(Rgb::from_packed(0x808080).luminance(), 0.2159, 1e-3));
    // green dominates the weighting
    assert!(luminance(Rgb::from_packed(0x00FF00)) > luminance(Rgb::from_packed(0xFF0000)));
    assert!(luminance(Rgb::from_packed(0xFF0000)) > luminance(Rgb::from_packed(0x0000FF)));
}

#[test]
fn should_compute_unnormalized_contrast_ratio() {
    assert!(approx(contrast_ratio(Rgb::WHITE, Rgb::BLACK), 21.0, 1e-9));
    assert!(approx(contrast_ratio(Rgb::BLACK, Rgb::WHITE), 1.0 / 21.0, 1e-9));
    assert!(approx(
        contrast_ratio(Rgb::WHITE, Rgb::from_packed(0x808080)),
        3.949,
        1e-3
    ));
    assert!(approx(contrast_ratio(Rgb::from_packed(0x123456), Rgb::from_packed(0x123456)), 1.0, 1e-12));
}

#[test]
fn should_convert_between_rgb_and_hls() {
    let (h, l, s) = rgb_to_hls(Rgb::from_packed(0x336699).to_unit());
    assert!(approx(h, 7.0 / 12.0, 1e-9));
    assert!(approx(l, 0.4, 1e-9));
    assert!(approx(s, 0.5, 1e-9));

    let back = Rgb::from_unit(hls_to_rgb(h, l, s));
    assert_eq!(back, Rgb::from_packed(0x336699));

    let (_, l, s) = rgb_to_hls(Rgb::from_packed(0x808080).to_unit());
    assert!(approx(s, 0.0, 1e-12));
    assert!(approx(l, 128.0 / 255.0, 1e-12));
}

#[test]
fn should_lighten_and_darken_in_hls_space() {
    let color = Rgb::from_packed(0x336699);
    assert_eq!(lighten(color, 1.5), Rgb::new(102, 153, 204));
    assert_eq!(darken(color, 1.5), Rgb::new(34, 68, 102));
    assert_eq!(lighten(color, 10.0), Rgb::WHITE);
    assert_eq!(lighten(color, 1.0), color);
    assert_eq!(darken(color, 1.0), color);
}

#[test]
fn should_lighten_black_to_white_with_infinite_factor() {
    assert_eq!(lighten(Rgb::BLACK, f64::INFINITY), Rgb::WHITE);
    assert_eq!(lighten(Rgb::BLACK, 2.0), Rgb::BLACK);
}

#[test]
fn should_undo_lighten_with_darken_within_one_step() {
    let colors = [
        Rgb::new(200, 30, 40),
        Rgb::new(12, 200, 150),
        Rgb::new(90, 60, 220),
        Rgb::new(255, 128, 0),
        Rgb::new(10, 20, 30),
        Rgb::new(240, 230, 100),
        Rgb::from_packed(0x336699),
    ];
    for color in colors {
        for factor in [0.5, 0.75, 0.9, 1.0] {
            let back = darken(lighten(color, factor), factor);
            let diff = [
                back.r.abs_diff(color.r),
                back.g.abs_diff(color.g),
                back.b.abs_diff(color.b),
            ];
            assert!(
                diff.iter().all(|&d| d <= 1),
                "{} with factor {} came back as {}",
                color,
                factor,
                back
            );
        }
    }
}

#[test]
fn should_bound_round_trip_error_by_inverse_factor_for_small_factors() {
    let colors = [
        Rgb::new(200, 30, 40),
        Rgb::new(12, 200, 150),
        Rgb::new(90, 60, 220),
        Rgb::new(255, 128, 0),
        Rgb::new(10, 20, 30),
        Rgb::new(240, 230, 100),
        Rgb::from_packed(0x336699),
    ];
    // lightness is quantized at `f` times its value, so the error grows like 1 / f
    for factor in [0.1_f64, 0.2, 0.25] {
        let tolerance = (1.0 / factor).ceil() as u8;
        for color in colors {
            let back = darken(lighten(color, factor), factor);
            let worst = back
                .r
                .abs_diff(color.r)
                .max(back.g.abs_diff(color.g))
                .max(back.b.abs_diff(color.b));
            assert!(
                worst <= tolerance,
                "{} with factor {} came back as {}",
                color,
                factor,
                back
            );
        }
    }
}
