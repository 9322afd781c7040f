use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Add,
    Sub,
    Mul,
}

impl OpCode {
    pub fn symbol(self) -> &'static str {
        match self {
            OpCode::Add => "+",
            OpCode::Sub => "-",
            OpCode::Mul => "*",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Folds `src` into `dest` column by column. Both slices span the same years.
#[inline(always)]
pub fn execute_instruction(op: OpCode, dest: &mut [f64], src: &[f64]) {
    debug_assert_eq!(dest.len(), src.len());
    match op {
        OpCode::Add => {
            for (d, s) in dest.iter_mut().zip(src) { *d += s; }
        }
        OpCode::Sub => {
            for (d, s) in dest.iter_mut().zip(src) { *d -= s; }
        }
        OpCode::Mul => {
            for (d, s) in dest.iter_mut().zip(src) { *d *= s; }
        }
    }
}
