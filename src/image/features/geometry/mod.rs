pub mod point;

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct Offset {
    pub x: isize,
    pub y: isize
}

/// Every integer offset within `radius` of the origin, row by row
pub fn disk_offsets(radius: usize) -> Vec<Offset> {
    let r = radius as isize;
    let r_sqr = r*r;
    let mut offsets = Vec::<Offset>::with_capacity(((2*r+1)*(2*r+1)) as usize);
    for y in -r..r+1 {
        for x in -r..r+1 {
            if x*x + y*y <= r_sqr {
                offsets.push(Offset{x,y});
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_is_symmetric() {
        let offsets = disk_offsets(3);
        assert_eq!(offsets.len(), 29);
        for o in &offsets {
            assert!(offsets.contains(&Offset{x: -o.x, y: -o.y}));
        }
    }
}
