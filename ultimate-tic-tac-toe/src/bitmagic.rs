use crate::types::Index;

/// yields the indices of all set bits, lowest first
#[derive(Debug, Clone, Copy)]
pub struct SetBitIter(u128);

impl SetBitIter {
    pub const fn new(bits: u128) -> Self {
        Self(bits)
    }
}

impl Iterator for SetBitIter {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            //   0bX100   & 0bX011   = 0bX000
            //   0bXY01   & 0bXY00   = 0bXY00
            //   0bXY10   & 0bXY01   = 0bXY00
            //   0bXY11   & 0bXY10   = 0bXY10
            let idx = self.0.trailing_zeros();
            self.0 &= self.0 - 1;
            Some(idx as Index)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for SetBitIter {}

pub const fn count_ones(bits: u128) -> u32 {
    bits.count_ones()
}

/// # Panics
/// if `x` has `n` or fewer bits set
pub fn index_of_nth_setbit(x: u128, n: u8) -> u32 {
    #[cfg(target_arch = "x86_64")]
    {
        if std::arch::is_x86_feature_detected!("bmi2")
            && std::arch::is_x86_feature_detected!("popcnt")
        {
            assert!(n < x.count_ones() as u8, "not enough bits set to get the n-th index");
            // safety: the required cpu features were just detected
            return unsafe { index_of_nth_setbit_x64_bmi(x, n) };
        }
    }
    index_of_nth_setbit_fallback(x, n)
}

/// # Safety
/// requires cpu features popcnt,bmi1,bmi2 and at least `n + 1` set bits in `x`
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "popcnt,bmi1,bmi2")]
unsafe fn index_of_nth_setbit_x64_bmi(x: u128, n: u8) -> u32 {
    let lo: u64 = x as u64;
    let hi: u64 = (x >> 64) as u64;

    let lo_count = lo.count_ones() as u8;

    let (part, base, n) = if n < lo_count {
        (lo, 0u32, n)
    } else {
        (hi, 64u32, n - lo_count)
    };

    // deposit a single bit onto the n-th set bit of `part`
    unsafe {
        let sel = core::arch::x86_64::_pdep_u64(1u64 << n, part);
        base + core::arch::x86_64::_tzcnt_u64(sel) as u32
    }
}

pub fn index_of_nth_setbit_fallback(x: u128, n: u8) -> u32 {
    SetBitIter::new(x)
        .nth(n as usize)
        .expect("not enough bits set to get the n-th index") as u32
}
