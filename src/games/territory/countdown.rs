use std::collections::VecDeque;

use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownCue {
    Number(u32),
    Start,
}

impl std::fmt::Display for CountdownCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountdownCue::Number(n) => write!(f, "{}", n),
            CountdownCue::Start => f.write_str("START!"),
        }
    }
}

/// A list of (duration, payload) steps advanced by the simulation tick.
///
/// Each payload is handed out when its step begins. Once the last step has
/// run its course the sequence is finished and the completion receiver, if
/// one was taken, resolves.
pub struct TimedSequence<T> {
    steps: VecDeque<(f32, T)>,
    elapsed: f32,
    started: bool,
    finished: bool,
    done: Option<oneshot::Sender<()>>,
}

impl<T: Clone> TimedSequence<T> {
    pub fn new(steps: impl IntoIterator<Item = (f32, T)>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            elapsed: 0.0,
            started: false,
            finished: false,
            done: None,
        }
    }

    /// Resolves when the sequence finishes. Taking a new receiver drops the
    /// previous one.
    pub fn completion(&mut self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        if self.finished {
            let _ = tx.send(());
        } else {
            self.done = Some(tx);
        }
        rx
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current(&self) -> Option<&T> {
        if self.started { self.steps.front().map(|(_, p)| p) } else { None }
    }

    /// Begin the first step, returning its payload.
    pub fn start(&mut self) -> Option<T> {
        if self.started {
            return None;
        }
        self.started = true;
        let first = self.steps.front().map(|(_, p)| p.clone());
        if first.is_none() {
            self.finish();
        }
        first
    }

    /// Move the sequence forward by `dt`, returning the payloads of every
    /// step that began along the way.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        let mut entered = Vec::new();
        if self.finished {
            return entered;
        }
        if let Some(first) = self.start() {
            entered.push(first);
        }

        self.elapsed += dt;
        while let Some((duration, _)) = self.steps.front() {
            if self.elapsed < *duration {
                break;
            }
            self.elapsed -= *duration;
            self.steps.pop_front();
            if let Some((_, payload)) = self.steps.front() {
                entered.push(payload.clone());
            }
        }

        if self.steps.is_empty() {
            self.finish();
        }
        entered
    }

    fn finish(&mut self) {
        self.finished = true;
        if let Some(tx) = self.done.take() {
            let _ = tx.send(());
        }
    }
}

/// "3", "2", "1", then the start cue.
pub fn countdown_sequence(step_secs: f32, start_secs: f32) -> TimedSequence<CountdownCue> {
    TimedSequence::new([
        (step_secs, CountdownCue::Number(3)),
        (step_secs, CountdownCue::Number(2)),
        (step_secs, CountdownCue::Number(1)),
        (start_secs, CountdownCue::Start),
    ])
}
