use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed, ordered set of platform values with display labels.
///
/// `ALL` is the catalog order. The serde representation of every value is
/// its label, so a frontend can exchange either the label or the index.
pub trait Parameter: Copy + PartialEq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    /// Raw value handed to the platform audio subsystem.
    fn code(self) -> i32;

    fn label(self) -> &'static str;
}

macro_rules! parameter_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = ($label:literal, $code:expr) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant, )+
        }

        impl Parameter for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn code(self) -> i32 {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

parameter_enum! {
    /// Hardware or software origin of captured audio.
    CaptureSource {
        Default = ("DEFAULT", 0),
        Mic = ("MIC", 1),
        VoiceUplink = ("VOICE_UPLINK", 2),
        VoiceDownlink = ("VOICE_DOWNLINK", 3),
        VoiceCall = ("VOICE_CALL", 4),
        Camcorder = ("CAMCORDER", 5),
        VoiceRecognition = ("VOICE_RECOGNITION", 6),
        VoiceCommunication = ("VOICE_COMMUNICATION", 7),
        RemoteSubmix = ("REMOTE_SUBMIX", 8),
        Unprocessed = ("UNPROCESSED", 9),
        VoicePerformance = ("VOICE_PERFORMANCE", 10),
    }
}

parameter_enum! {
    /// Sample format shared by the capture and playback devices.
    SampleEncoding {
        Default = ("ENCODING_DEFAULT", 1),
        Pcm16Bit = ("ENCODING_PCM_16BIT", 2),
        Pcm8Bit = ("ENCODING_PCM_8BIT", 3),
        PcmFloat = ("ENCODING_PCM_FLOAT", 4),
        Ac3 = ("ENCODING_AC3", 5),
        EAc3 = ("ENCODING_E_AC3", 6),
        Dts = ("ENCODING_DTS", 7),
        DtsHd = ("ENCODING_DTS_HD", 8),
        Iec61937 = ("ENCODING_IEC61937", 13),
        DolbyMat = ("ENCODING_DOLBY_MAT", 19),
    }
}

parameter_enum! {
    /// Channel roles of the capture device.
    InputChannelMask {
        Default = ("CHANNEL_IN_DEFAULT", 1),
        Left = ("CHANNEL_IN_LEFT", 0x4),
        Right = ("CHANNEL_IN_RIGHT", 0x8),
        Front = ("CHANNEL_IN_FRONT", 0x10),
        Back = ("CHANNEL_IN_BACK", 0x20),
        LeftProcessed = ("CHANNEL_IN_LEFT_PROCESSED", 0x40),
        RightProcessed = ("CHANNEL_IN_RIGHT_PROCESSED", 0x80),
        FrontProcessed = ("CHANNEL_IN_FRONT_PROCESSED", 0x100),
        BackProcessed = ("CHANNEL_IN_BACK_PROCESSED", 0x200),
        Pressure = ("CHANNEL_IN_PRESSURE", 0x400),
        XAxis = ("CHANNEL_IN_X_AXIS", 0x800),
        YAxis = ("CHANNEL_IN_Y_AXIS", 0x1000),
        ZAxis = ("CHANNEL_IN_Z_AXIS", 0x2000),
        VoiceUplink = ("CHANNEL_IN_VOICE_UPLINK", 0x4000),
        VoiceDownlink = ("CHANNEL_IN_VOICE_DNLINK", 0x8000),
        Mono = ("CHANNEL_IN_MONO", 0x10),
        Stereo = ("CHANNEL_IN_STEREO", 0xC),
    }
}

parameter_enum! {
    /// Speaker roles of the playback device.
    OutputChannelMask {
        Default = ("CHANNEL_OUT_DEFAULT", 1),
        FrontLeft = ("CHANNEL_OUT_FRONT_LEFT", 0x4),
        FrontRight = ("CHANNEL_OUT_FRONT_RIGHT", 0x8),
        FrontCenter = ("CHANNEL_OUT_FRONT_CENTER", 0x10),
        LowFrequency = ("CHANNEL_OUT_LOW_FREQUENCY", 0x20),
        BackLeft = ("CHANNEL_OUT_BACK_LEFT", 0x40),
        BackRight = ("CHANNEL_OUT_BACK_RIGHT", 0x80),
        FrontLeftOfCenter = ("CHANNEL_OUT_FRONT_LEFT_OF_CENTER", 0x100),
        FrontRightOfCenter = ("CHANNEL_OUT_FRONT_RIGHT_OF_CENTER", 0x200),
        BackCenter = ("CHANNEL_OUT_BACK_CENTER", 0x400),
        SideLeft = ("CHANNEL_OUT_SIDE_LEFT", 0x800),
        SideRight = ("CHANNEL_OUT_SIDE_RIGHT", 0x1000),
        Mono = ("CHANNEL_OUT_MONO", 0x4),
        Stereo = ("CHANNEL_OUT_STEREO", 0xC),
        Quad = ("CHANNEL_OUT_QUAD", 0xCC),
        Surround = ("CHANNEL_OUT_SURROUND", 0x41C),
        FivePointOne = ("CHANNEL_OUT_5POINT1", 0xFC),
        SevenPointOneSurround = ("CHANNEL_OUT_7POINT1_SURROUND", 0x18FC),
    }
}

parameter_enum! {
    /// Output routing and volume-control category.
    StreamClass {
        VoiceCall = ("STREAM_VOICE_CALL", 0),
        System = ("STREAM_SYSTEM", 1),
        Ring = ("STREAM_RING", 2),
        Music = ("STREAM_MUSIC", 3),
        Alarm = ("STREAM_ALARM", 4),
        Notification = ("STREAM_NOTIFICATION", 5),
        Dtmf = ("STREAM_DTMF", 8),
    }
}

impl SampleEncoding {
    /// Bytes per sample for PCM encodings. Compressed encodings are opaque
    /// and return `None`.
    pub fn bytes_per_sample(self) -> Option<usize> {
        match self {
            Self::Pcm8Bit => Some(1),
            Self::Default | Self::Pcm16Bit => Some(2),
            Self::PcmFloat => Some(4),
            _ => None,
        }
    }

    pub fn is_pcm(self) -> bool {
        self.bytes_per_sample().is_some()
    }
}

impl InputChannelMask {
    /// Number of channels in the mask; `None` lets the platform pick.
    pub fn channel_count(self) -> Option<u16> {
        match self {
            Self::Default => None,
            mask => channels_in(mask.code()),
        }
    }
}

impl OutputChannelMask {
    /// Number of channels in the mask; `None` lets the platform pick.
    pub fn channel_count(self) -> Option<u16> {
        match self {
            Self::Default => None,
            mask => channels_in(mask.code()),
        }
    }
}

fn channels_in(mask: i32) -> Option<u16> {
    u16::try_from(mask.count_ones()).ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_platform_names() {
        assert_eq!(CaptureSource::Mic.label(), "MIC");
        assert_eq!(SampleEncoding::Pcm16Bit.to_string(), "ENCODING_PCM_16BIT");
        assert_eq!(InputChannelMask::VoiceDownlink.label(), "CHANNEL_IN_VOICE_DNLINK");
        assert_eq!(OutputChannelMask::FivePointOne.label(), "CHANNEL_OUT_5POINT1");
        assert_eq!(StreamClass::Dtmf.label(), "STREAM_DTMF");
    }

    #[test]
    fn composite_masks_match_their_parts() {
        assert_eq!(
            InputChannelMask::Stereo.code(),
            InputChannelMask::Left.code() | InputChannelMask::Right.code()
        );
        assert_eq!(InputChannelMask::Mono.code(), InputChannelMask::Front.code());
        assert_eq!(
            OutputChannelMask::Quad.code(),
            OutputChannelMask::FrontLeft.code()
                | OutputChannelMask::FrontRight.code()
                | OutputChannelMask::BackLeft.code()
                | OutputChannelMask::BackRight.code()
        );
        assert_eq!(OutputChannelMask::Mono.code(), OutputChannelMask::FrontLeft.code());
    }

    #[test]
    fn channel_counts() {
        assert_eq!(InputChannelMask::Default.channel_count(), None);
        assert_eq!(OutputChannelMask::Default.channel_count(), None);
        assert_eq!(InputChannelMask::Mono.channel_count(), Some(1));
        assert_eq!(InputChannelMask::Stereo.channel_count(), Some(2));
        assert_eq!(OutputChannelMask::Surround.channel_count(), Some(4));
        assert_eq!(OutputChannelMask::FivePointOne.channel_count(), Some(6));
        assert_eq!(OutputChannelMask::SevenPointOneSurround.channel_count(), Some(8));
    }

    #[test]
    fn default_masks_are_valid_platform_values() {
        // Zero is the platform's invalid mask.
        assert_eq!(InputChannelMask::Default.code(), 1);
        assert_eq!(OutputChannelMask::Default.code(), 1);
        assert!(InputChannelMask::ALL.iter().all(|m| m.code() != 0));
        assert!(OutputChannelMask::ALL.iter().all(|m| m.code() != 0));
    }

    #[test]
    fn sample_widths() {
        assert_eq!(SampleEncoding::Pcm8Bit.bytes_per_sample(), Some(1));
        assert_eq!(SampleEncoding::Pcm16Bit.bytes_per_sample(), Some(2));
        assert_eq!(SampleEncoding::Default.bytes_per_sample(), Some(2));
        assert_eq!(SampleEncoding::PcmFloat.bytes_per_sample(), Some(4));
        assert!(!SampleEncoding::Ac3.is_pcm());
        assert!(!SampleEncoding::DolbyMat.is_pcm());
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&StreamClass::Music).unwrap();
        assert_eq!(json, "\"STREAM_MUSIC\"");

        let parsed: OutputChannelMask = serde_json::from_str("\"CHANNEL_OUT_QUAD\"").unwrap();
        assert_eq!(parsed, OutputChannelMask::Quad);
    }
}
