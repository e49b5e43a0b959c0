/// Vector math helpers on top of nalgebra
use nalgebra::Vector3;

/// Construct a point on a cylinder around the Y axis from cylindrical
/// coordinates: `radius` from the axis, `angle` in radians, `height`
/// along the axis.
pub fn cylindrical(radius: f32, angle: f32, height: f32) -> Vector3<f32> {
    Vector3::new(radius * angle.cos(), height, radius * angle.sin())
}

/// Rescale `v` in place so its magnitude equals `|length|`. A negative
/// `length` flips the direction. The zero vector is left untouched so
/// that no NaN components are ever produced.
pub fn set_length(v: &mut Vector3<f32>, length: f32) {
    let sq = v.norm_squared();
    if sq == 0.0 {
        return;
    }
    *v *= length / sq.sqrt();
}

/// Value-returning variant of [`set_length`].
pub fn scaled_to(v: &Vector3<f32>, length: f32) -> Vector3<f32> {
    let mut out = *v;
    set_length(&mut out, length);
    out
}
