//! Rolling average over a fixed-length circular buffer
//!
//! Maintains a running sum so the mean is O(1) per sample. Before the buffer
//! has been filled once, unwritten slots count as zero, biasing the mean
//! toward zero for the first `len` samples. That warm-up behavior is part of
//! the contract; do not replace it with a partial-fill divisor.

/// Circular buffer with a running sum for O(1) mean computation
#[derive(Debug, Clone)]
pub struct RollingAverage {
    buffer: Vec<f64>,
    index: usize,
    sum: f64,
}

impl RollingAverage {
    /// Create with a window of `num_samples` (clamped to at least 1)
    pub fn new(num_samples: usize) -> Self {
        let mut avg = RollingAverage {
            buffer: Vec::new(),
            index: 0,
            sum: 0.0,
        };
        avg.set_size(num_samples);
        avg
    }

    /// Resize the window, discarding all history
    ///
    /// The buffer is zeroed and the sum reset; `calculate` returns 0 until
    /// new samples arrive. Lossy by design.
    pub fn set_size(&mut self, num_samples: usize) {
        let num_samples = num_samples.max(1);
        self.buffer.clear();
        self.buffer.resize(num_samples, 0.0);
        self.index = 0;
        self.sum = 0.0;
    }

    /// Add a sample, evicting the oldest value at the write position
    pub fn add_sample(&mut self, sample: f64) {
        self.sum -= self.buffer[self.index];
        self.sum += sample;

        self.buffer[self.index] = sample;

        self.index += 1;
        self.index %= self.buffer.len();
    }

    /// Mean over the full window (zero-padded during warm-up)
    pub fn calculate(&self) -> f64 {
        self.sum / self.buffer.len() as f64
    }

    /// Window length in samples
    pub fn len(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for RollingAverage {
    fn default() -> Self {
        Self::new(1)
    }
}
