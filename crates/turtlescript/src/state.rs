use std::collections::HashMap;

use crate::value::Val;

/// How long an armed capture stays armed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CaptureMode {
    /// The first invocation after `capture` stores its result and disarms.
    #[default]
    Once,
    /// Every invocation after `capture` overwrites the variable, until `endcapture`.
    Continuous,
}

impl std::str::FromStr for CaptureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "once" => Ok(CaptureMode::Once),
            "continuous" => Ok(CaptureMode::Continuous),
            _ => Err(format!(
                "unknown capture mode {s:?} (expected once or continuous)"
            )),
        }
    }
}

/// Variables captured during a script run, and the variable (if any) that the next result goes into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptureState {
    vars: HashMap<String, Val>,
    armed: Option<String>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `name` as the capture target, replacing any previous target.
    pub fn arm(&mut self, name: impl Into<String>) {
        self.armed = Some(name.into());
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn armed(&self) -> Option<&str> {
        self.armed.as_deref()
    }

    /// The last value captured into `name`, or [`Val::None`] if nothing was.
    pub fn get(&self, name: &str) -> Val {
        self.vars.get(name).cloned().unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, val: Val) {
        self.vars.insert(name.into(), val);
    }

    pub fn vars(&self) -> impl Iterator<Item = (&str, &Val)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Stores the result of an invocation.
    ///
    /// `before` is the target that was armed when the invocation started. The result is only
    /// stored if that same target is still armed, so the call that arms a target never captures
    /// into it, and `endcapture` never captures anything. Returns the name stored into.
    pub fn store_result(
        &mut self,
        before: Option<&str>,
        val: Val,
        mode: CaptureMode,
    ) -> Option<String> {
        let name = match (before, self.armed.as_deref()) {
            (Some(b), Some(now)) if b == now => now.to_owned(),
            _ => return None,
        };
        if mode == CaptureMode::Once {
            self.armed = None;
        }
        self.vars.insert(name.clone(), val);
        Some(name)
    }
}
