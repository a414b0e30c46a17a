use super::Error;

/// Highest order ever produced by RNX2CRX
pub const MAX_ORDER: usize = 5;

/// [NumDiff] recovers numerical data compressed with the recursive
/// differential equations defined by Y. Hatanaka.
#[derive(Debug, Clone)]
pub struct NumDiff {
    /// internal counter
    n: usize,
    /// compression order
    order: usize,
    /// state vector
    state: [i64; MAX_ORDER + 1],
}

impl NumDiff {
    /// Builds a new [NumDiff], initialized with given value.
    pub fn new(order: usize, init: i64) -> Result<Self, Error> {
        if order > MAX_ORDER {
            return Err(Error::OrderTooBig(MAX_ORDER));
        }
        let mut state = [0; MAX_ORDER + 1];
        state[0] = init;
        Ok(Self { n: 0, order, state })
    }

    /// Recovers data by computing the recursive differential equation.
    /// The state is left untouched when the recovery overflows.
    pub fn recover(&mut self, data: i64) -> Result<i64, Error> {
        let n = std::cmp::min(self.n + 1, self.order);
        let mut state = [0; MAX_ORDER + 1];
        state[n] = data;
        for index in (0..n).rev() {
            state[index] = state[index + 1]
                .checked_add(self.state[index])
                .ok_or(Error::Overflow)?;
        }
        self.n = n;
        self.state = state;
        Ok(self.state[0])
    }
}
