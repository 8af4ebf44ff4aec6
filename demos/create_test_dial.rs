use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

/// Draws a 320x320 gauge whose needle sits at 60% of a 0-100 scale and
/// writes `test_dial.png` plus a matching `test_dial.json` config.
fn main() -> anyhow::Result<()> {
    let mut img = RgbImage::from_pixel(320, 320, Rgb([235, 235, 225]));
    let (cx, cy) = (160.0f32, 160.0f32);
    let ink = Rgb([20, 20, 20]);

    // Rim
    draw_hollow_circle_mut(&mut img, (160, 160), 120, Rgb([140, 140, 140]));

    // Ticks every 27° from 135° to 405°
    for i in 0..=10 {
        let angle = (135.0f32 + 27.0 * i as f32).to_radians();
        let (sin, cos) = angle.sin_cos();
        draw_line_segment_mut(
            &mut img,
            (cx + 105.0 * cos, cy + 105.0 * sin),
            (cx + 118.0 * cos, cy + 118.0 * sin),
            Rgb([140, 140, 140]),
        );
    }

    // Needle at 60%: 135° + 0.6 * 270° = 297°
    let (sin, cos) = 297.0f32.to_radians().sin_cos();
    for offset in -3..=3 {
        let (ox, oy) = (-sin * offset as f32, cos * offset as f32);
        draw_line_segment_mut(
            &mut img,
            (cx + ox, cy + oy),
            (cx + 95.0 * cos + ox, cy + 95.0 * sin + oy),
            ink,
        );
    }
    draw_filled_circle_mut(&mut img, (160, 160), 8, ink);

    img.save("test_dial.png")?;

    let config = r#"{
  "crop": { "top_left": { "x": 30, "y": 30 }, "bottom_right": { "x": 290, "y": 290 } },
  "center": { "x": 130, "y": 130 },
  "axis": { "x": 240, "y": 240 },
  "start_angle": 135.0,
  "end_angle": 405.0,
  "start_range": 0,
  "end_range": 100,
  "min_line_length": 40,
  "max_line_gap": 3,
  "threshold_value": 90
}
"#;
    std::fs::write("test_dial.json", config)?;

    println!("Created test_dial.png and test_dial.json");
    println!("Try: gaugeread read --config test_dial.json test_dial.png");
    Ok(())
}
