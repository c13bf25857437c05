use std::f32::consts::TAU;

const BLACKMAN_HARRIS: [f32; 4] = [0.35875, -0.48829, 0.14128, -0.01168];

/// 4-term Blackman-Harris window, symmetric, `len` coefficients.
pub fn blackman_harris(len: usize) -> Vec<f32> {
    if len <= 1 {
        return vec![1.0; len];
    }

    let scale = TAU / (len - 1) as f32;
    (0..len)
        .map(|n| {
            let phase = n as f32 * scale;
            BLACKMAN_HARRIS
                .iter()
                .enumerate()
                .fold(0.0f32, |sum, (k, &a)| a.mul_add((phase * k as f32).cos(), sum))
        })
        .collect()
}
