//! Colorant catalog: process and spot inks in render order.
//!
//! The catalog fixes the order the renderer uses to size and fill its
//! separation buffers: process colorants first, in channel order, then spot
//! colorants in the order they were added. Each colorant carries a
//! representation vector with one component per process channel.
//!
//! # Example
//!
//! ```rust
//! use inkset_core::ColorantCatalog;
//!
//! let mut catalog = ColorantCatalog::cmyk();
//! catalog.add_spot("Orange", vec![0.0, 0.6, 1.0, 0.0]).unwrap();
//!
//! assert_eq!(catalog.num_process(), 4);
//! assert_eq!(catalog.num_spots(), 1);
//! assert_eq!(catalog.index_of("Orange"), Some(4));
//! assert_eq!(catalog.get(1).unwrap().representation(), &[0.0, 1.0, 0.0, 0.0]);
//! ```

use crate::{Error, Result};

/// Role of a colorant in the separation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorantKind {
    /// A process channel of the output (e.g. Cyan).
    Process,
    /// A named ink merged into the process channels.
    Spot,
}

/// A single printing ink.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorant {
    name: String,
    kind: ColorantKind,
    representation: Vec<f32>,
}

impl Colorant {
    /// Colorant name, unique within its catalog.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Process or spot.
    #[inline]
    pub fn kind(&self) -> ColorantKind {
        self.kind
    }

    /// Per process channel deposit of a solid tint, each in `[0, 1]`.
    ///
    /// For process colorants this is the one-hot vector of their channel.
    #[inline]
    pub fn representation(&self) -> &[f32] {
        &self.representation
    }

    /// Returns `true` for process colorants.
    #[inline]
    pub fn is_process(&self) -> bool {
        self.kind == ColorantKind::Process
    }

    /// Returns `true` for spot colorants.
    #[inline]
    pub fn is_spot(&self) -> bool {
        self.kind == ColorantKind::Spot
    }
}

/// Ordered set of process then spot colorants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorantCatalog {
    process: Vec<Colorant>,
    spots: Vec<Colorant>,
}

impl ColorantCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the four device process colorants.
    pub fn cmyk() -> Self {
        const NAMES: [&str; 4] = ["Cyan", "Magenta", "Yellow", "Black"];
        let process = NAMES
            .iter()
            .enumerate()
            .map(|(channel, name)| Colorant {
                name: name.to_string(),
                kind: ColorantKind::Process,
                representation: (0..NAMES.len()).map(|c| if c == channel { 1.0 } else { 0.0 }).collect(),
            })
            .collect();
        Self {
            process,
            spots: Vec::new(),
        }
    }

    /// Creates a catalog from an ordered list of process colorant names.
    pub fn with_process<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::new();
        for name in names {
            catalog.add_process(name)?;
        }
        Ok(catalog)
    }

    /// Appends a process colorant and returns its channel index.
    ///
    /// # Errors
    ///
    /// - [`Error::ProcessAfterSpot`] once any spot has been added
    /// - [`Error::DuplicateColorant`] if the name is taken
    pub fn add_process(&mut self, name: impl Into<String>) -> Result<usize> {
        let name = name.into();
        if !self.spots.is_empty() {
            return Err(Error::ProcessAfterSpot(name));
        }
        if self.index_of(&name).is_some() {
            return Err(Error::DuplicateColorant(name));
        }

        let channel = self.process.len();
        for existing in &mut self.process {
            existing.representation.push(0.0);
        }
        let mut representation = vec![0.0; channel + 1];
        representation[channel] = 1.0;
        self.process.push(Colorant {
            name,
            kind: ColorantKind::Process,
            representation,
        });
        Ok(channel)
    }

    /// Appends a spot colorant and returns its buffer index.
    ///
    /// The representation must have one component per process channel,
    /// each finite and within `[0, 1]`.
    pub fn add_spot(
        &mut self,
        name: impl Into<String>,
        representation: impl Into<Vec<f32>>,
    ) -> Result<usize> {
        let name = name.into();
        let representation = representation.into();
        if self.index_of(&name).is_some() {
            return Err(Error::DuplicateColorant(name));
        }
        if representation.len() != self.process.len() {
            return Err(Error::representation_arity(
                name,
                self.process.len(),
                representation.len(),
            ));
        }
        if let Some((index, &value)) = representation
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || !(0.0..=1.0).contains(*v))
        {
            return Err(Error::InvalidRepresentation {
                colorant: name,
                index,
                value,
            });
        }

        self.spots.push(Colorant {
            name,
            kind: ColorantKind::Spot,
            representation,
        });
        Ok(self.len() - 1)
    }

    /// Buffer index of a colorant, process entries first.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.colorants().position(|c| c.name == name)
    }

    /// Like [`index_of`](Self::index_of) but reports unknown names as errors.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| Error::UnknownColorant(name.to_string()))
    }

    /// Number of process channels.
    #[inline]
    pub fn num_process(&self) -> usize {
        self.process.len()
    }

    /// Number of spot colorants.
    #[inline]
    pub fn num_spots(&self) -> usize {
        self.spots.len()
    }

    /// Total number of colorants (and of separation buffers).
    #[inline]
    pub fn len(&self) -> usize {
        self.process.len() + self.spots.len()
    }

    /// Returns `true` if the catalog has no colorants.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Process colorants in channel order.
    #[inline]
    pub fn process(&self) -> &[Colorant] {
        &self.process
    }

    /// Spot colorants in merge order.
    #[inline]
    pub fn spots(&self) -> &[Colorant] {
        &self.spots
    }

    /// All colorants in buffer order.
    pub fn colorants(&self) -> impl Iterator<Item = &Colorant> + '_ {
        self.process.iter().chain(self.spots.iter())
    }

    /// Colorant at a buffer index.
    pub fn get(&self, index: usize) -> Option<&Colorant> {
        if index < self.process.len() {
            self.process.get(index)
        } else {
            self.spots.get(index - self.process.len())
        }
    }

    /// Colorant names in buffer order.
    pub fn names(&self) -> Vec<&str> {
        self.colorants().map(|c| c.name.as_str()).collect()
    }

    /// Builds a catalog from the inks a renderer found on a page.
    ///
    /// Inks whose name matches a process colorant are skipped. Each
    /// remaining ink is classified by `selection`: retained inks become
    /// spot entries, ignored inks are dropped, and the rest are left for
    /// the renderer to emulate in the process plates.
    pub fn from_inks<I, S>(process: I, inks: &[InkInfo], selection: &SpotSelection) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::with_process(process)?;
        for ink in inks {
            if catalog.process.iter().any(|p| p.name == ink.name) {
                continue;
            }
            match selection.classify(&ink.name) {
                SpotDisposition::Retain => {
                    catalog.add_spot(ink.name.clone(), ink.components.clone())?;
                }
                SpotDisposition::Ignore | SpotDisposition::Emulate => {}
            }
        }
        Ok(catalog)
    }
}

/// An ink reported by the renderer, with its alternate-space components.
///
/// Components are in process channel order, e.g. C, M, Y, K.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InkInfo {
    /// Ink name.
    pub name: String,
    /// Alternate-space components, one per process channel.
    pub components: Vec<f32>,
}

impl InkInfo {
    /// Creates an ink record.
    pub fn new(name: impl Into<String>, components: impl Into<Vec<f32>>) -> Self {
        Self {
            name: name.into(),
            components: components.into(),
        }
    }
}

/// What happens to a discovered spot ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotDisposition {
    /// Rendered to its own separation and merged.
    Retain,
    /// Not rendered at all.
    Ignore,
    /// Left to the renderer, which folds it into the process plates.
    Emulate,
}

/// Which discovered spot inks get their own separation.
///
/// An empty selection retains every spot. Otherwise names in `ignore` are
/// dropped, names in `retain` are kept, and any other spot is emulated.
/// `ignore` wins when a name appears in both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpotSelection {
    /// Spots rendered to their own separation.
    pub retain: Vec<String>,
    /// Spots excluded from rendering.
    pub ignore: Vec<String>,
}

impl SpotSelection {
    /// Retain every spot ink.
    pub fn all() -> Self {
        Self::default()
    }

    /// Explicit retain and ignore lists.
    pub fn new<R, I, S>(retain: R, ignore: I) -> Self
    where
        R: IntoIterator<Item = S>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            retain: retain.into_iter().map(Into::into).collect(),
            ignore: ignore.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a comma-separated list of ink names, trimming whitespace.
    ///
    /// ```rust
    /// use inkset_core::SpotSelection;
    /// assert_eq!(SpotSelection::parse_list(" Orange, Green ,,"), vec!["Orange", "Green"]);
    /// ```
    pub fn parse_list(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Classifies a spot ink name.
    pub fn classify(&self, name: &str) -> SpotDisposition {
        if self.ignore.iter().any(|n| n == name) {
            SpotDisposition::Ignore
        } else if self.retain.is_empty() && self.ignore.is_empty() {
            SpotDisposition::Retain
        } else if self.retain.iter().any(|n| n == name) {
            SpotDisposition::Retain
        } else {
            SpotDisposition::Emulate
        }
    }
}
