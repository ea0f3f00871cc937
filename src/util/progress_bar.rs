use indicatif::{ProgressBar, ProgressState, ProgressStyle};

/// Style for bars with a known length, e.g. the parallel finalization jobs
pub fn get_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}); ETA: {eta_precise} {msg}")
        .unwrap()
        .with_key("percent", |state: &ProgressState, w: &mut dyn std::fmt::Write| write!(w, "{:.1}%", state.fraction()*100.0).unwrap())
        .progress_chars("##-")
}

/// Style for open-ended counters, the number of input reads is not known up front
pub fn get_spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {spinner:.cyan} {human_pos} reads; Speed: {per_sec} {msg}")
        .unwrap()
        .with_key("per_sec", |state: &ProgressState, w: &mut dyn std::fmt::Write| write!(w, "{:.0}/s", state.per_sec()).unwrap())
}

/// Creates a spinner for counting reads as they stream past
pub fn get_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner().with_style(get_spinner_style());
    spinner.enable_steady_tick(std::time::Duration::from_millis(200));
    spinner
}
