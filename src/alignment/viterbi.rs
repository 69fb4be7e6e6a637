use crate::error::AlignmentError;
use crate::types::PathPoint;

/// Cumulative score table over `(frame, emitted token count)`.
///
/// Row `t + 1`, column `k` holds the best log-probability of having emitted
/// exactly `k` tokens using frames `0..=t`. Row 0 is the state before any
/// frame: column 0 is `0`, every other column `-inf`.
#[derive(Debug, Clone)]
pub struct Trellis {
    num_frames: usize,
    num_tokens: usize,
    scores: Vec<f32>,
}

impl Trellis {
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn num_tokens(&self) -> usize {
        self.num_tokens
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.scores[row * (self.num_tokens + 1) + col]
    }

    #[inline(always)]
    fn set(&mut self, row: usize, col: usize, value: f32) {
        let width = self.num_tokens + 1;
        self.scores[row * width + col] = value;
    }

    /// Row holding the best score in the final token column.
    fn best_final_row(&self) -> usize {
        let mut best_row = 0;
        let mut best = f32::NEG_INFINITY;
        for row in 0..=self.num_frames {
            let score = self.get(row, self.num_tokens);
            if score > best {
                best = score;
                best_row = row;
            }
        }
        best_row
    }
}

/// Checks that every emission row covers the blank and all token indices.
pub fn check_emission_shape(
    log_probs: &[Vec<f32>],
    tokens: &[usize],
    blank_id: usize,
) -> Result<(), AlignmentError> {
    let needed = tokens
        .iter()
        .copied()
        .chain(std::iter::once(blank_id))
        .max()
        .map_or(0, |max| max + 1);
    if let Some((frame, row)) = log_probs
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() < needed)
    {
        return Err(AlignmentError::invalid_input(format!(
            "emission frame {frame} has {} columns, vocabulary needs {needed}",
            row.len()
        )));
    }
    Ok(())
}

/// Builds the monotonic CTC trellis.
///
/// `T[t+1][k] = max(T[t][k] + lp[t][blank], T[t][k-1] + lp[t][tokens[k-1]])`:
/// at every frame the path either stays on its token (the frame is blank or a
/// repeat) or advances to the next token. Tokens are never skipped.
pub fn build_trellis(log_probs: &[Vec<f32>], tokens: &[usize], blank_id: usize) -> Trellis {
    let num_frames = log_probs.len();
    let num_tokens = tokens.len();
    let mut trellis = Trellis {
        num_frames,
        num_tokens,
        scores: vec![f32::NEG_INFINITY; (num_frames + 1) * (num_tokens + 1)],
    };
    trellis.set(0, 0, 0.0);

    for (t, row) in log_probs.iter().enumerate() {
        let blank = row[blank_id];
        trellis.set(t + 1, 0, trellis.get(t, 0) + blank);
        for k in 1..=num_tokens {
            let stayed = trellis.get(t, k) + blank;
            let changed = trellis.get(t, k - 1) + row[tokens[k - 1]];
            trellis.set(t + 1, k, stayed.max(changed));
        }
    }
    trellis
}

/// Recovers the most likely frame-by-frame path from `trellis`.
///
/// Returns `None` when the frames run out before every token was consumed,
/// i.e. the audio is too short for the transcript.
pub fn backtrack(
    trellis: &Trellis,
    log_probs: &[Vec<f32>],
    tokens: &[usize],
    blank_id: usize,
) -> Option<Vec<PathPoint>> {
    if tokens.is_empty() {
        return Some(Vec::new());
    }

    // j and t index the trellis; the matching emission frame is t - 1 and the
    // matching token is j - 1.
    let mut j = trellis.num_tokens();
    let t_start = trellis.best_final_row();
    let mut path = Vec::with_capacity(t_start);

    for t in (1..=t_start).rev() {
        let row = &log_probs[t - 1];
        let stayed = trellis.get(t - 1, j) + row[blank_id];
        let changed = trellis.get(t - 1, j - 1) + row[tokens[j - 1]];
        let advanced = changed > stayed;
        let label = if advanced { tokens[j - 1] } else { blank_id };

        path.push(PathPoint {
            token_index: j - 1,
            time_index: t - 1,
            score: row[label].exp(),
        });

        if advanced {
            j -= 1;
            if j == 0 {
                path.reverse();
                return Some(path);
            }
        }
    }
    None
}

/// Trellis construction followed by backtracking.
pub fn forced_align(
    log_probs: &[Vec<f32>],
    tokens: &[usize],
    blank_id: usize,
) -> Option<Vec<PathPoint>> {
    let trellis = build_trellis(log_probs, tokens, blank_id);
    backtrack(&trellis, log_probs, tokens, blank_id)
}
