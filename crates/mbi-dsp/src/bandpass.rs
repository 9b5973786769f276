//! Second-order Butterworth bandpass IIR filter
//!
//! Designed from a (center, bandwidth) pair derived from the band's low/high
//! cutoffs: the second-order Butterworth prototype is bandpass-transformed
//! (four poles) and realized as a cascade of two biquad sections in Direct
//! Form II transposed. Delay-line state survives block boundaries so a
//! stream of consecutive blocks is filtered as one continuous signal; a
//! redesign zeroes the state and the resulting transient is accepted.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Butterworth design order; an order-n bandpass realizes as n cascaded
/// biquad sections
pub const FILTER_ORDER: usize = 2;

/// Single biquad section
///
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
///
/// Coefficients and state are f64: a narrow low band at an acquisition rate
/// of tens of kHz puts the poles within 1e-4 of the unit circle, closer
/// than f32 state can track.
#[derive(Debug, Clone)]
struct BiquadSection {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    // Direct Form II transposed state
    z1: f64,
    z2: f64,
}

impl BiquadSection {
    fn identity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    fn process_sample(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Second-order Butterworth bandpass filter (two cascaded biquads)
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    sections: [BiquadSection; FILTER_ORDER],
}

impl BandpassFilter {
    /// Create a pass-through filter; call `design` before processing
    pub fn new() -> Self {
        Self {
            sections: [BiquadSection::identity(), BiquadSection::identity()],
        }
    }

    /// Compute coefficients for the given cutoff pair at `sample_rate`
    ///
    /// Center = (low + high) / 2, bandwidth = high - low. Callers guarantee
    /// `low_cut < high_cut`; the high edge is clamped below Nyquist so no
    /// input is fatal, and the configured edges are otherwise used as given.
    /// Prior delay-line state is discarded.
    pub fn design(&mut self, sample_rate: f32, low_cut: f32, high_cut: f32) {
        let fs = f64::from(sample_rate);
        let high = f64::from(high_cut).min(0.49 * fs);
        let mut low = f64::from(low_cut);
        if low >= high {
            // Only reachable when the Nyquist clamp collapsed the band
            low = 0.95 * high;
        }

        // Pre-warped band edges for the bilinear transform
        let warped_low = 2.0 * fs * (PI * low / fs).tan();
        let warped_high = 2.0 * fs * (PI * high / fs).tan();
        let w0_sq = warped_low * warped_high;
        let bw = warped_high - warped_low;

        // Bandpass transform of one prototype pole p: the roots of
        // s^2 - p*bw*s + w0^2 = 0. The conjugate prototype pole contributes
        // the conjugate roots, so each root here seeds one biquad.
        let (qr, qi) = (-FRAC_1_SQRT_2 * bw / 2.0, FRAC_1_SQRT_2 * bw / 2.0);
        let (dr, di) = complex_sqrt(qr * qr - qi * qi - w0_sq, 2.0 * qr * qi);

        let poles = [(qr + dr, qi + di), (qr - dr, qi - di)];
        let center = (low + high) / 2.0;

        for (section, (sr, si)) in self.sections.iter_mut().zip(poles) {
            // Bilinear transform: z = (2fs + s) / (2fs - s)
            let (zr, zi) = complex_div(2.0 * fs + sr, si, 2.0 * fs - sr, -si);

            let a1 = -2.0 * zr;
            let a2 = zr * zr + zi * zi;

            // Bandpass zeros land at z = +1 and z = -1; normalize the
            // section to unit gain at the center frequency
            let gain = 1.0 / section_response(a1, a2, 2.0 * PI * center / fs);

            section.b0 = gain;
            section.b1 = 0.0;
            section.b2 = -gain;
            section.a1 = a1;
            section.a2 = a2;
        }

        self.reset();
    }

    /// Filter one sample, advancing the delay lines
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let mut sample = f64::from(input);
        for section in &mut self.sections {
            sample = section.process_sample(sample);
        }
        sample as f32
    }

    /// Filter a run of samples in place
    pub fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Zero the delay lines without touching the coefficients
    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }
}

impl Default for BandpassFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Magnitude of (1 - z^-2) / (1 + a1*z^-1 + a2*z^-2) at angular frequency w
fn section_response(a1: f64, a2: f64, w: f64) -> f64 {
    let (cos1, sin1) = (w.cos(), w.sin());
    let (cos2, sin2) = ((2.0 * w).cos(), (2.0 * w).sin());

    let num = ((1.0 - cos2).powi(2) + sin2 * sin2).sqrt();
    let den = ((1.0 + a1 * cos1 + a2 * cos2).powi(2) + (a1 * sin1 + a2 * sin2).powi(2)).sqrt();

    num / den.max(f64::EPSILON)
}

/// Principal square root of x + iy
fn complex_sqrt(x: f64, y: f64) -> (f64, f64) {
    let r = x.hypot(y);
    let re = ((r + x) / 2.0).sqrt();
    let im = ((r - x) / 2.0).sqrt().copysign(y);
    (re, im)
}

/// (a + ib) / (c + id)
fn complex_div(a: f64, b: f64, c: f64, d: f64) -> (f64, f64) {
    let denom = c * c + d * d;
    ((a * c + b * d) / denom, (b * c - a * d) / denom)
}
