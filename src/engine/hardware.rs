//! Hardware encoder detection shared by every tool.
//!
//! The prober runs `ffmpeg -hide_banner -encoders` once; the matcher looks for
//! `{codec}_{backend}` names in that listing and picks the first backend in a
//! fixed per-platform order, falling back to the CPU encoder.

use std::fmt;
use std::process::Command;
use std::sync::OnceLock;

use tracing::debug;

use super::error::ProcessError;

/// Codec families that have vendor hardware encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecFamily {
    H264,
    Hevc,
    Vp8,
    Vp9,
    Av1,
    Prores,
}

impl CodecFamily {
    pub const ALL: [CodecFamily; 6] = [
        Self::H264,
        Self::Hevc,
        Self::Vp8,
        Self::Vp9,
        Self::Av1,
        Self::Prores,
    ];

    /// Token as it appears in ffmpeg encoder names (`hevc` in `hevc_nvenc`)
    pub fn token(&self) -> &'static str {
        match self {
            Self::H264 => "h264",
            Self::Hevc => "hevc",
            Self::Vp8 => "vp8",
            Self::Vp9 => "vp9",
            Self::Av1 => "av1",
            Self::Prores => "prores",
        }
    }

    /// Exact, case-sensitive lookup. Anything else is not a known family.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.token() == token)
    }
}

impl fmt::Display for CodecFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Operating system family, which decides the backends worth checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    WindowsLinux,
    MacOs,
    Other,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(any(target_os = "windows", target_os = "linux")) {
            Self::WindowsLinux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }
}

/// Encoding backend: a vendor accelerator or the software path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Nvenc,
    Qsv,
    Amf,
    VideoToolbox,
    Cpu,
}

impl Backend {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Nvenc => "nvenc",
            Self::Qsv => "qsv",
            Self::Amf => "amf",
            Self::VideoToolbox => "videotoolbox",
            Self::Cpu => "cpu",
        }
    }

    pub fn is_hardware(&self) -> bool {
        !matches!(self, Self::Cpu)
    }

    /// Encoder name passed to `-c:v` for the given codec token
    pub fn qualify(&self, codec: &str) -> String {
        match self {
            Self::Cpu => codec.to_string(),
            hw => format!("{}_{}", codec, hw.tag()),
        }
    }

    /// Backends checked on a platform, in checking order.
    ///
    /// The order is also the selection priority: the first match wins.
    pub fn table(os: OsFamily) -> &'static [Backend] {
        match os {
            OsFamily::WindowsLinux => &[Backend::Nvenc, Backend::Qsv, Backend::Amf],
            OsFamily::MacOs => &[Backend::VideoToolbox],
            OsFamily::Other => &[],
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Hardware backends usable for one codec family, in table order.
///
/// An empty list means the CPU encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendCandidateList(Vec<Backend>);

impl BackendCandidateList {
    /// The selected backend: first candidate, or `Cpu`
    pub fn first(&self) -> Backend {
        self.0.first().copied().unwrap_or(Backend::Cpu)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Backend] {
        &self.0
    }
}

/// Codec the user asked for, plus the container it will be written into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecRequest {
    pub family: String,
    pub container: Option<String>,
}

impl CodecRequest {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            container: None,
        }
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn known_family(&self) -> Option<CodecFamily> {
        CodecFamily::parse(&self.family)
    }
}

/// Scan an encoder listing for hardware variants of `codec`
pub fn candidate_backends(codec: &str, os: OsFamily, encoders: &str) -> BackendCandidateList {
    let Some(family) = CodecFamily::parse(codec) else {
        return BackendCandidateList::default();
    };

    let found = Backend::table(os)
        .iter()
        .copied()
        .filter(|backend| encoders.contains(&backend.qualify(family.token())))
        .collect();

    BackendCandidateList(found)
}

/// Pick the backend for `codec`: first match in table order, else `Cpu`
pub fn resolve_backend(codec: &str, os: OsFamily, encoders: &str) -> Backend {
    candidate_backends(codec, os, encoders).first()
}

/// Run the encoder listing (the capability probe)
pub fn list_encoders(ffmpeg: &str) -> Result<String, ProcessError> {
    let output = Command::new(ffmpeg)
        .args(["-hide_banner", "-encoders"])
        .output()
        .map_err(|source| ProcessError::Launch {
            program: ffmpeg.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ProcessError::Failed {
            program: ffmpeg.to_string(),
            status: output.status.to_string(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Cache for the output of `ffmpeg -encoders`. The compiled-in encoder set
/// cannot change while the process is alive.
static FFMPEG_ENCODERS_OUTPUT_CACHE: OnceLock<String> = OnceLock::new();

/// Capability prober with optional per-process caching
#[derive(Debug, Clone)]
pub struct EncoderProbe {
    ffmpeg: String,
    cache: bool,
}

impl EncoderProbe {
    pub fn new(ffmpeg: impl Into<String>, cache: bool) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            cache,
        }
    }

    pub fn encoders(&self) -> Result<String, ProcessError> {
        if !self.cache {
            return list_encoders(&self.ffmpeg);
        }
        if let Some(cached) = FFMPEG_ENCODERS_OUTPUT_CACHE.get() {
            return Ok(cached.clone());
        }
        let listing = list_encoders(&self.ffmpeg)?;
        Ok(FFMPEG_ENCODERS_OUTPUT_CACHE.get_or_init(|| listing).clone())
    }

    /// Resolve the backend for a request on this machine.
    ///
    /// With `use_hardware` off the prober is not run at all.
    pub fn backend_for(
        &self,
        request: &CodecRequest,
        use_hardware: bool,
    ) -> Result<Backend, ProcessError> {
        if !use_hardware || request.known_family().is_none() {
            return Ok(Backend::Cpu);
        }
        let listing = self.encoders()?;
        let backend = resolve_backend(&request.family, OsFamily::current(), &listing);
        debug!(codec = %request.family, %backend, "resolved encoder backend");
        Ok(backend)
    }
}
