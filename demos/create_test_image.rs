use image::{Rgba, RgbaImage};

fn main() {
    let mut img = RgbaImage::new(320, 240);

    // Gradient background with a few salt-and-pepper specks
    for y in 0..240 {
        for x in 0..320 {
            let r = (x * 255 / 320) as u8;
            let g = (y * 255 / 240) as u8;
            let b = 128;
            img.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }

    // A solid white bar for the morphology demo
    for y in 100..140 {
        for x in 60..260 {
            img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }

    for i in 0..40u32 {
        let x = (i * 97) % 320;
        let y = (i * 61) % 240;
        let v = if i % 2 == 0 { 255 } else { 0 };
        img.put_pixel(x, y, Rgba([v, v, v, 255]));
    }

    img.save("test_image.png").unwrap();
    println!("Created test_image.png (320x240 RGBA gradient with bar and specks)");
}
