#[derive(Debug,Clone,PartialEq,Eq)]
pub struct BitVector{
    data: Vec<u64>,
    entries: usize,
    bits: usize
}

impl BitVector {

    pub fn new(n: usize) -> BitVector{
        let size = (n + BitVector::bits_per_element() - 1)/BitVector::bits_per_element();
        BitVector{data: vec![0; size], entries: 0, bits: n }
    }

    pub fn bits_per_element() -> usize {
        u64::BITS as usize
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn bytes(&self) -> usize {
        (self.bits + 7)/8
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn is_full(&self) -> bool {
        self.entries == self.bits
    }

    /// Appends the next bit. Bits beyond the declared length are ignored.
    pub fn add_value(&mut self, new_val: bool) -> () {
        if self.is_full() {
            return;
        }
        if new_val {
            let element = self.entries / BitVector::bits_per_element();
            let offset = self.entries % BitVector::bits_per_element();
            self.data[element] |= 1u64 << offset;
        }
        self.entries += 1;
    }

    pub fn get(&self, idx: usize) -> bool {
        let element = idx / BitVector::bits_per_element();
        let offset = idx % BitVector::bits_per_element();
        idx < self.entries && (self.data[element] >> offset) & 1 == 1
    }

    pub fn hamming_distance(&self, other: &BitVector) -> u64 {
        self.data.iter().zip(other.data.iter()).map(|(a,b)| (a ^ b).count_ones() as u64).sum()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_distance_counts_differing_bits() {
        let mut a = BitVector::new(128);
        let mut b = BitVector::new(128);
        for i in 0..128 {
            a.add_value(i % 3 == 0);
            b.add_value(i % 2 == 0);
        }
        let expected = (0..128).filter(|i| (i % 3 == 0) != (i % 2 == 0)).count() as u64;
        assert_eq!(a.hamming_distance(&b), expected);
        assert_eq!(a.hamming_distance(&a), 0);
        assert!(a.is_full());
        assert!(a.get(3) && !a.get(4));
    }

    #[test]
    fn overflowing_bits_are_ignored() {
        let mut a = BitVector::new(8);
        for _ in 0..10 {
            a.add_value(true);
        }
        assert_eq!(a.entries(), 8);
        assert_eq!(a.bytes(), 1);
        assert_eq!(a.hamming_distance(&BitVector::new(8)), 8);
    }
}
