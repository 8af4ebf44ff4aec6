use gaugeread::detection::gauge::needle_angle;
use gaugeread::{GaugeError, GaugeScale, NeedleTip};
use std::f64::consts::{FRAC_PI_2, PI};

const CENTER: (f64, f64) = (100.0, 100.0);

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_lower_half_dial() -> anyhow::Result<()> {
    // Scale runs from 180° to 0°; straight down is 90° in image coordinates
    let scale = GaugeScale::new(180.0, 0.0, 0.0, 100.0)?;
    let tip = NeedleTip { x: 100, y: 200 };

    approx(needle_angle(CENTER, tip), FRAC_PI_2);
    approx(scale.ratio_at(CENTER, tip), 0.5);
    approx(scale.value_at(CENTER, tip), 50.0);

    Ok(())
}

#[test]
fn test_needle_angle_is_normalized() {
    approx(needle_angle(CENTER, NeedleTip { x: 150, y: 100 }), 0.0);
    approx(needle_angle(CENTER, NeedleTip { x: 50, y: 100 }), PI);
    approx(needle_angle(CENTER, NeedleTip { x: 100, y: 0 }), 3.0 * FRAC_PI_2);
    approx(needle_angle(CENTER, NeedleTip { x: 150, y: 50 }), 7.0 * PI / 4.0);
}

#[test]
fn test_readings_are_not_clamped() -> anyhow::Result<()> {
    let scale = GaugeScale::new(180.0, 0.0, 0.0, 100.0)?;

    // Straight up sits outside the lower-half arc
    approx(scale.value_at(CENTER, NeedleTip { x: 100, y: 0 }), -50.0);

    Ok(())
}

#[test]
fn test_angles_are_used_as_given() -> anyhow::Result<()> {
    // A scale that wraps through 0° is expressed with an end angle past 360°
    let scale = GaugeScale::new(135.0, 405.0, 0.0, 100.0)?;

    approx(scale.value_at(CENTER, NeedleTip { x: 100, y: 20 }), 50.0);
    approx(scale.value_at(CENTER, NeedleTip { x: 20, y: 100 }), 100.0 / 6.0);
    // The needle angle itself is never unwrapped past 2π
    approx(scale.value_at(CENTER, NeedleTip { x: 150, y: 100 }), -50.0);

    Ok(())
}

#[test]
fn test_descending_value_range() -> anyhow::Result<()> {
    let scale = GaugeScale::new(180.0, 360.0, 10.0, 0.0)?;

    approx(scale.value_at(CENTER, NeedleTip { x: 0, y: 100 }), 10.0);
    approx(scale.value_at(CENTER, NeedleTip { x: 100, y: 0 }), 5.0);

    Ok(())
}

#[test]
fn test_zero_span_is_rejected() {
    let err = GaugeScale::new(90.0, 90.0, 0.0, 100.0).unwrap_err();
    assert_eq!(
        err,
        GaugeError::DegenerateSpan {
            start: 90.0,
            end: 90.0
        }
    );

    assert!(GaugeScale::new(f64::NAN, 90.0, 0.0, 100.0).is_err());
}
