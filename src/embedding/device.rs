use candle_core::Device;
use tracing::warn;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

/// Picks the compute device for `component` (GPU if compiled in and present, else CPU).
///
/// Never fails: every GPU failure degrades to [`Device::Cpu`] with a warning,
/// so a grading session can always start.
pub fn select_device(component: &'static str) -> Device {
    #[cfg(any(feature = "metal", feature = "cuda"))]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    let failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!(component, "Using Metal GPU acceleration");
                return device;
            }
            Err(e) => {
                warn!(component, error = %e, "Metal device unavailable");
                failures.push(format!("metal: {e}"));
            }
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!(component, "Using CUDA GPU acceleration");
                return device;
            }
            Err(e) => {
                warn!(component, error = %e, "CUDA device unavailable");
                failures.push(format!("cuda: {e}"));
            }
        }
    }

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    {
        debug!(component, "No GPU backend compiled in");
    }

    if !failures.is_empty() {
        warn!(component, reason = %failures.join("; "), "Falling back to CPU device");
    }

    Device::Cpu
}
