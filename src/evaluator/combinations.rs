/// Iterator over every 5-element index combination of `0..n`, in lexicographic order.
///
/// For a 7-card Hold'em hand this yields the C(7,5) = 21 candidate hands; it
/// works for any `n >= 5` so callers can score arbitrary card sets.
pub struct FiveOf {
    n: usize,
    indices: [usize; 5],
    done: bool,
}

impl FiveOf {
    pub fn new(n: usize) -> Self {
        Self { n, indices: [0, 1, 2, 3, 4], done: n < 5 }
    }
}

impl Iterator for FiveOf {
    type Item = [usize; 5];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.indices;

        // Find the rightmost index that can still move right
        let mut i = 4;
        loop {
            if self.indices[i] < self.n - (5 - i) {
                self.indices[i] += 1;
                for j in (i + 1)..5 {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
        }

        Some(result)
    }
}

/// Number of 5-card subsets of `n` cards.
#[cfg(test)]
pub fn count_five_of(n: usize) -> usize {
    if n < 5 {
        return 0;
    }
    (0..5).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}
