/**
Element-wise accumulation of per-band vectors, used when summing
per-tetrahedron contributions band by band.
*/
use std::ops::AddAssign;

pub trait ElementWiseAddAssign<Rhs: ?Sized = Self> {
    fn add_assign(&mut self, rhs: &Rhs);
}

impl<T> ElementWiseAddAssign<[T]> for Vec<T>
where
    T: Copy + AddAssign,
{
    fn add_assign(&mut self, other: &[T]) {
        self.iter_mut()
            .zip(other.iter())
            .for_each(|(a, b)| *a += *b);
    }
}

#[cfg(test)]
#[test]
fn test_element_wise_add_assign() {
    let mut per_band: Vec<f64> = vec![0.0, 0.25, 0.5];
    per_band.add_assign(&[0.5, 0.25, 0.0][..]);
    assert_eq!(vec![0.5, 0.5, 0.5], per_band);
}
