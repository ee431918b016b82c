use ffkit::engine::hardware::{
    Backend, CodecFamily, CodecRequest, EncoderProbe, OsFamily, candidate_backends,
    resolve_backend,
};

const NVENC_ONLY: &str = "\
Encoders:
 V....D libx265              libx265 H.265 / HEVC (codec hevc)
 V....D hevc_nvenc           NVIDIA NVENC hevc encoder (codec hevc)
";

const EVERYTHING: &str = "\
 V....D h264_nvenc   h264_qsv   h264_amf   h264_videotoolbox
 V....D hevc_nvenc   hevc_qsv   hevc_amf   hevc_videotoolbox
 V....D av1_nvenc    av1_qsv    av1_amf
 V....D vp9_qsv      prores_videotoolbox
";

#[test]
fn nvenc_wins_when_it_is_the_only_hevc_encoder() {
    assert_eq!(
        resolve_backend("hevc", OsFamily::WindowsLinux, NVENC_ONLY),
        Backend::Nvenc
    );
    assert_eq!(
        resolve_backend("h264", OsFamily::WindowsLinux, NVENC_ONLY),
        Backend::Cpu
    );
}

#[test]
fn table_order_decides_between_vendors() {
    for family in [CodecFamily::H264, CodecFamily::Hevc, CodecFamily::Av1] {
        assert_eq!(
            resolve_backend(family.token(), OsFamily::WindowsLinux, EVERYTHING),
            Backend::Nvenc
        );
    }
    assert_eq!(
        resolve_backend("vp9", OsFamily::WindowsLinux, EVERYTHING),
        Backend::Qsv
    );
    assert_eq!(
        candidate_backends("hevc", OsFamily::WindowsLinux, EVERYTHING).as_slice(),
        &[Backend::Nvenc, Backend::Qsv, Backend::Amf]
    );
}

#[test]
fn macos_resolves_videotoolbox_or_cpu() {
    assert_eq!(
        resolve_backend("prores", OsFamily::MacOs, EVERYTHING),
        Backend::VideoToolbox
    );
    assert_eq!(resolve_backend("av1", OsFamily::MacOs, EVERYTHING), Backend::Cpu);
}

#[test]
fn qualified_names_match_ffmpeg_encoders() {
    for family in CodecFamily::ALL {
        let backend = resolve_backend(family.token(), OsFamily::WindowsLinux, EVERYTHING);
        let name = backend.qualify(family.token());
        if backend.is_hardware() {
            assert!(EVERYTHING.contains(&name), "{} not listed", name);
        } else {
            assert_eq!(name, family.token());
        }
    }
}

#[test]
fn hardware_disabled_never_probes() {
    let probe = EncoderProbe::new("/nonexistent/ffmpeg-for-ffkit-tests", true);
    for family in CodecFamily::ALL {
        let request = CodecRequest::new(family.token()).with_container("mkv");
        assert_eq!(probe.backend_for(&request, false).unwrap(), Backend::Cpu);
    }
}
