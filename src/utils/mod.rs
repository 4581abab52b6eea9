use std::fmt;
use std::time::Instant;

/// A simple timer based on std::time::Instant, that prints the elapsed time
pub struct Timer {
    time: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Timer { time: Instant::now() }
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:>68} {:>8.2} s",
            "elapsed time:",
            self.time.elapsed().as_secs_f32()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_prints_elapsed_seconds() {
        let timer: Timer = Timer::start();
        let line: String = format!("{}", timer);
        assert_eq!(line.len(), 68 + 1 + 8 + 2);
        assert!(line.trim_start().starts_with("elapsed time:"));
        assert!(line.ends_with(" s"));
    }
}
