use crate::Float;
use crate::numerics::wrap_angle;
use crate::image::Image;
use crate::image::features::geometry::Offset;

fn moment((p,q): (i32,i32), image: &Image, offsets: &[Offset], x_center: usize, y_center: usize) -> Float {
    let mut moment = 0.0;
    for offset in offsets {
        let x = x_center as isize + offset.x;
        let y = y_center as isize + offset.y;
        if x >= 0 && y >= 0 && (x as usize) < image.width() && (y as usize) < image.height() {
            let intensity = image.buffer[(y as usize, x as usize)];
            moment += (offset.x as Float).powi(p)*(offset.y as Float).powi(q)*intensity;
        }
    }

    moment
}

/// Angle of the vector from the patch center to its intensity centroid, in [0, 2pi)
pub fn orientation(image: &Image, x_center: usize, y_center: usize, offsets: &[Offset]) -> Float {
    let m_0_1 = moment((0,1), image, offsets, x_center, y_center);
    let m_1_0 = moment((1,0), image, offsets, x_center, y_center);

    wrap_angle(m_0_1.atan2(m_1_0))
}
