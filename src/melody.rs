//! Reading a genome as a melody.
//!
//! The genome is cut into [`BITS_PER_NOTE`]-bit chunks, one per note slot.
//! A chunk's value is a scale degree, or a rest when it has its top bit set.
//! Repeated degrees are tied into one longer note. Only the data is produced
//! here; playing it or writing it to a MIDI file is up to the host.

use crate::{Genome, error::MelodyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BITS_PER_NOTE: usize = 4;

/// Chunk values at or above this are rests.
const REST_THRESHOLD: u64 = 1 << (BITS_PER_NOTE - 1);

/// Octaves spanned by [`Scale::midi_notes`].
const SCALE_OCTAVES: u8 = 2;

/// Musical key, including enharmonic spellings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    C,
    CSharp,
    DFlat,
    D,
    DSharp,
    EFlat,
    E,
    F,
    FSharp,
    GFlat,
    G,
    GSharp,
    AFlat,
    A,
    ASharp,
    BFlat,
    B,
}

impl Key {
    pub const ALL: [Key; 17] = [
        Key::C,
        Key::CSharp,
        Key::DFlat,
        Key::D,
        Key::DSharp,
        Key::EFlat,
        Key::E,
        Key::F,
        Key::FSharp,
        Key::GFlat,
        Key::G,
        Key::GSharp,
        Key::AFlat,
        Key::A,
        Key::ASharp,
        Key::BFlat,
        Key::B,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Key::C => "C",
            Key::CSharp => "C#",
            Key::DFlat => "Db",
            Key::D => "D",
            Key::DSharp => "D#",
            Key::EFlat => "Eb",
            Key::E => "E",
            Key::F => "F",
            Key::FSharp => "F#",
            Key::GFlat => "Gb",
            Key::G => "G",
            Key::GSharp => "G#",
            Key::AFlat => "Ab",
            Key::A => "A",
            Key::ASharp => "A#",
            Key::BFlat => "Bb",
            Key::B => "B",
        }
    }

    /// Semitones above C.
    pub fn pitch_class(self) -> u8 {
        match self {
            Key::C => 0,
            Key::CSharp | Key::DFlat => 1,
            Key::D => 2,
            Key::DSharp | Key::EFlat => 3,
            Key::E => 4,
            Key::F => 5,
            Key::FSharp | Key::GFlat => 6,
            Key::G => 7,
            Key::GSharp | Key::AFlat => 8,
            Key::A => 9,
            Key::ASharp | Key::BFlat => 10,
            Key::B => 11,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = MelodyError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MelodyError::UnknownName {
                kind: "key",
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for Key {
    type Error = MelodyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name().to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scale {
    Major,
    MelodicMinor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    MajorBlues,
    MinorBlues,
}

impl Scale {
    pub const ALL: [Scale; 8] = [
        Scale::Major,
        Scale::MelodicMinor,
        Scale::Dorian,
        Scale::Phrygian,
        Scale::Lydian,
        Scale::Mixolydian,
        Scale::MajorBlues,
        Scale::MinorBlues,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::MelodicMinor => "minorM",
            Scale::Dorian => "dorian",
            Scale::Phrygian => "phrygian",
            Scale::Lydian => "lydian",
            Scale::Mixolydian => "mixolydian",
            Scale::MajorBlues => "majorBlues",
            Scale::MinorBlues => "minorBlues",
        }
    }

    /// Semitone offsets of one octave, starting at the tonic.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Scale::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            Scale::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Scale::MajorBlues => &[0, 2, 3, 4, 7, 9],
            Scale::MinorBlues => &[0, 3, 5, 6, 7, 10],
        }
    }

    /// MIDI notes of two octaves of this scale, starting on `key` in octave
    /// `root_octave` (octave 4 puts C on MIDI 60).
    ///
    /// Returns `None` if the top note would leave the MIDI range.
    pub fn midi_notes(self, key: Key, root_octave: u8) -> Option<Vec<u8>> {
        let tonic = 12u32 * (u32::from(root_octave) + 1) + u32::from(key.pitch_class());
        (0..u32::from(SCALE_OCTAVES))
            .flat_map(|octave| {
                self.intervals()
                    .iter()
                    .map(move |&iv| tonic + 12 * octave + u32::from(iv))
            })
            .map(|note| u8::try_from(note).ok().filter(|&n| n <= 127))
            .collect()
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = MelodyError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scale::ALL
            .into_iter()
            .find(|sc| sc.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MelodyError::UnknownName {
                kind: "scale",
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for Scale {
    type Error = MelodyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Scale> for String {
    fn from(scale: Scale) -> Self {
        scale.name().to_string()
    }
}

/// How a genome is read as music.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MelodyConfig {
    pub num_bars: usize,
    pub num_notes: usize,
    /// Number of voices; voice `s` is shifted `2 * s` scale degrees up.
    pub num_steps: usize,
    /// Whether chunks with the top bit set become rests. When off, the top
    /// bit is ignored.
    pub pauses: bool,
    pub key: Key,
    pub scale: Scale,
    /// Octave of the scale's tonic.
    pub root: u8,
    pub bpm: u32,
}

impl Default for MelodyConfig {
    fn default() -> Self {
        Self {
            num_bars: 8,
            num_notes: 4,
            num_steps: 1,
            pauses: true,
            key: Key::C,
            scale: Scale::Major,
            root: 4,
            bpm: 128,
        }
    }
}

impl MelodyConfig {
    /// Bits a genome needs to fill every note slot.
    pub fn genome_length(&self) -> usize {
        self.num_bars * self.num_notes * BITS_PER_NOTE
    }

    /// Length of one note slot, in beats (a bar is four beats).
    pub fn note_length(&self) -> f64 {
        4.0 / self.num_notes as f64
    }

    pub fn validate(&self) -> Result<(), MelodyError> {
        if self.num_bars == 0 || self.num_notes == 0 || self.num_steps == 0 {
            return Err(MelodyError::Invalid(
                "num_bars, num_notes and num_steps must be greater than 0".into(),
            ));
        }
        if self.bpm == 0 {
            return Err(MelodyError::Invalid("bpm must be greater than 0".into()));
        }
        if self.scale.midi_notes(self.key, self.root).is_none() {
            return Err(MelodyError::Invalid(format!(
                "{} {} from octave {} leaves the MIDI range",
                self.key, self.scale, self.root
            )));
        }
        Ok(())
    }
}

/// Little-endian integer value of `bits`: bit `i` weighs `2^i`. Bits past
/// the 64th are ignored.
pub fn int_from_bits(bits: &[bool]) -> u64 {
    bits.iter()
        .take(64)
        .enumerate()
        .filter(|&(_, &bit)| bit)
        .fold(0, |acc, (i, _)| acc | (1u64 << i))
}

/// A single sounding note, in beats from the start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteEvent {
    pub time: f64,
    pub pitch: u8,
    pub duration: f64,
    pub velocity: u8,
}

/// Parallel note, velocity and beat sequences.
///
/// `notes` holds one line of MIDI pitches per voice; every line, `velocity`
/// and `beat` share the same length. A velocity of 0 marks a rest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Melody {
    pub notes: Vec<Vec<u8>>,
    pub velocity: Vec<u8>,
    pub beat: Vec<f64>,
}

impl Melody {
    /// Total length in beats, rests included.
    pub fn duration(&self) -> f64 {
        self.beat.iter().sum()
    }

    /// Every sounding note of every voice, ordered by time then voice.
    pub fn note_events(&self) -> Vec<NoteEvent> {
        let mut events = Vec::new();
        let mut time = 0.0;
        for (i, (&velocity, &duration)) in self.velocity.iter().zip(&self.beat).enumerate() {
            if velocity > 0 {
                events.extend(self.notes.iter().map(|voice| NoteEvent {
                    time,
                    pitch: voice[i],
                    duration,
                    velocity,
                }));
            }
            time += duration;
        }
        events
    }
}

/// Reads `genome` as a melody under `config`.
///
/// Bits past [`MelodyConfig::genome_length`] are ignored.
///
/// A rest always ends a tie: degree 0 right after a rest starts a new note.
/// Comparing against the rest's placeholder degree would instead stretch
/// the rest; this reading deliberately does not.
pub fn genome_to_melody(genome: &Genome, config: &MelodyConfig) -> Result<Melody, MelodyError> {
    config.validate()?;
    let expected = config.genome_length();
    if genome.len() < expected {
        return Err(MelodyError::GenomeTooShort {
            expected,
            actual: genome.len(),
        });
    }
    let scale_notes = config
        .scale
        .midi_notes(config.key, config.root)
        .ok_or_else(|| MelodyError::Invalid("scale leaves the MIDI range".into()))?;
    let note_length = config.note_length();

    let mut degrees: Vec<u64> = Vec::new();
    let mut velocity = Vec::new();
    let mut beat: Vec<f64> = Vec::new();
    // Degree of the last sounding slot, if the last slot was not a rest.
    let mut last: Option<u64> = None;

    for chunk in genome.bits()[..expected].chunks(BITS_PER_NOTE) {
        let mut value = int_from_bits(chunk);
        if !config.pauses {
            value %= REST_THRESHOLD;
        }
        if value >= REST_THRESHOLD {
            degrees.push(0);
            velocity.push(0);
            beat.push(note_length);
            last = None;
        } else if last == Some(value) {
            if let Some(b) = beat.last_mut() {
                *b += note_length;
            }
        } else {
            degrees.push(value);
            velocity.push(127);
            beat.push(note_length);
            last = Some(value);
        }
    }

    let len = scale_notes.len() as u64;
    let notes = (0..config.num_steps as u64)
        .map(|step| {
            degrees
                .iter()
                .map(|&d| scale_notes[((d + step * 2) % len) as usize])
                .collect()
        })
        .collect();

    Ok(Melody {
        notes,
        velocity,
        beat,
    })
}
