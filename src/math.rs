use nalgebra as na;
use num_traits::Float;

/// Computes the 3x3 homography mapping the four `src` points onto the
/// four `dst` points via the direct linear transform, with the lower
/// right element fixed to one.
///
/// Returns `None` when the correspondences are rank-deficient (three or
/// more collinear points, or repeated points).
pub fn homography<T: na::ComplexField + Float>(
    src: &[na::Point2<T>; 4],
    dst: &[na::Point2<T>; 4],
) -> Option<na::Matrix3<T>> {
    let mut a = na::SMatrix::<T, 8, 8>::zeros();
    let mut b = na::SVector::<T, 8>::zeros();

    for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
        let r = i * 2;

        a[(r, 0)] = s.x;
        a[(r, 1)] = s.y;
        a[(r, 2)] = T::one();
        a[(r, 6)] = -d.x * s.x;
        a[(r, 7)] = -d.x * s.y;
        b[r] = d.x;

        a[(r + 1, 3)] = s.x;
        a[(r + 1, 4)] = s.y;
        a[(r + 1, 5)] = T::one();
        a[(r + 1, 6)] = -d.y * s.x;
        a[(r + 1, 7)] = -d.y * s.y;
        b[r + 1] = d.y;
    }

    let h = a.lu().solve(&b)?;

    Some(na::Matrix3::new(
        h[0],
        h[1],
        h[2],
        h[3],
        h[4],
        h[5],
        h[6],
        h[7],
        T::one(),
    ))
}

/// Applies a homography to a point, including the perspective divide.
#[inline]
pub fn apply_homography<T: na::ComplexField + Float>(
    m: &na::Matrix3<T>,
    p: na::Point2<T>,
) -> na::Point2<T> {
    let v = m * na::Vector3::new(p.x, p.y, T::one());

    na::Point2::new(v.x / v.z, v.y / v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(pts: [(f32, f32); 4]) -> [na::Point2<f32>; 4] {
        pts.map(|(x, y)| na::Point2::new(x, y))
    }

    #[test]
    fn identity_correspondence_yields_identity() {
        let q = quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let m = homography(&q, &q).unwrap();

        let p = apply_homography(&m, na::Point2::new(0.25, 0.75));
        assert!((p.x - 0.25).abs() < 1e-5);
        assert!((p.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn maps_unit_square_to_scaled_rect() {
        let src = quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let dst = quad([(0.0, 0.0), (200.0, 0.0), (200.0, 100.0), (0.0, 100.0)]);
        let m = homography(&src, &dst).unwrap();

        let p = apply_homography(&m, na::Point2::new(0.5, 0.5));
        assert!((p.x - 100.0).abs() < 1e-3);
        assert!((p.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn projective_quad_maps_corners_exactly() {
        let src = quad([(400.0, 500.0), (1500.0, 500.0), (1900.0, 1000.0), (20.0, 1000.0)]);
        let dst = quad([(0.0, 0.0), (1920.0, 0.0), (1920.0, 1080.0), (0.0, 1080.0)]);
        let m = homography(&src, &dst).unwrap();

        for (s, d) in src.iter().zip(dst.iter()) {
            let p = apply_homography(&m, *s);
            assert!((p.x - d.x).abs() < 1e-1, "{:?} vs {:?}", p, d);
            assert!((p.y - d.y).abs() < 1e-1, "{:?} vs {:?}", p, d);
        }
    }

    #[test]
    fn collinear_source_points_have_no_homography() {
        let src = quad([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let dst = quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);

        assert!(homography(&src, &dst).is_none());
    }
}
