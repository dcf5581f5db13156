//! Validated struct and list descriptors.
//!
//! A descriptor is the output of [`crate::structptr`] or [`crate::listptr`]:
//! it names an absolute, already-bounds-checked word range within a buffer,
//! so that [`crate::accessor`] never needs to repeat containment arithmetic.

/// The element type a validated list pointer resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// 0: zero-width elements; only the count is meaningful.
    Void,
    /// 1: single-bit elements, 8 per byte, LSB first.
    Bit,
    /// 2: one-byte elements.
    Byte1,
    /// 3: two-byte elements.
    Byte2,
    /// 4: four-byte elements.
    Byte4,
    /// 5: eight-byte, non-pointer elements.
    Byte8,
    /// 6: one-pointer-word elements.
    Pointer,
    /// 7: composite elements, each a fixed-shape struct.
    Composite {
        /// Data words per element, taken from the composite tag word.
        n_data_words: u16,
        /// Pointer slots per element, taken from the composite tag word.
        n_pointers: u16,
    },
}

impl ElementType {
    /// Decode the 3-bit element type code into an [`ElementType`], for the
    /// non-composite cases. Composite (code 7) requires the tag word and is
    /// constructed directly by [`crate::listptr`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ElementType::Void),
            1 => Some(ElementType::Bit),
            2 => Some(ElementType::Byte1),
            3 => Some(ElementType::Byte2),
            4 => Some(ElementType::Byte4),
            5 => Some(ElementType::Byte8),
            6 => Some(ElementType::Pointer),
            _ => None,
        }
    }
}

/// A validated struct: an absolute, in-bounds word range split into a data
/// section followed by a pointer-slot section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructDescriptor {
    /// Absolute word index of the first data word.
    pub data_start: usize,
    /// Number of data words.
    pub n_data_words: u16,
    /// Number of pointer slots, immediately following the data words.
    pub n_pointers: u16,
}

impl StructDescriptor {
    /// Absolute word index of the first pointer slot.
    pub fn pointers_start(&self) -> usize {
        self.data_start + self.n_data_words as usize
    }

    /// Total word count covered by this struct (data words + pointer slots).
    pub fn total_words(&self) -> usize {
        self.n_data_words as usize + self.n_pointers as usize
    }
}

/// A validated list: an absolute, in-bounds word range of uniformly-typed
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDescriptor {
    /// Absolute word index of the first word of content.
    pub content_start: usize,
    /// Number of elements in the list.
    pub n_elements: u32,
    /// The element type.
    pub elem_type: ElementType,
}

impl ListDescriptor {
    /// Word size of a single element, for element types with a fixed
    /// per-element word stride. Returns `None` for [`ElementType::Bit`],
    /// whose elements do not individually occupy whole words.
    pub fn element_word_stride(&self) -> Option<usize> {
        match self.elem_type {
            ElementType::Void => Some(0),
            ElementType::Bit => None,
            ElementType::Byte1 | ElementType::Byte2 | ElementType::Byte4 => Some(0),
            ElementType::Byte8 | ElementType::Pointer => Some(1),
            ElementType::Composite {
                n_data_words,
                n_pointers,
            } => Some(n_data_words as usize + n_pointers as usize),
        }
    }

    /// Total content word count, for element types whose content occupies
    /// whole words regardless of sub-word packing (everything except the
    /// sub-word byte family, which is sized in bytes not words by the
    /// caller).
    pub fn total_content_words(&self) -> usize {
        match self.elem_type {
            ElementType::Void => 0,
            ElementType::Bit => (self.n_elements as usize).div_ceil(64),
            ElementType::Byte1 => (self.n_elements as usize).div_ceil(8),
            ElementType::Byte2 => (self.n_elements as usize * 2).div_ceil(8),
            ElementType::Byte4 => (self.n_elements as usize * 4).div_ceil(8),
            ElementType::Byte8 | ElementType::Pointer => self.n_elements as usize,
            ElementType::Composite {
                n_data_words,
                n_pointers,
            } => self.n_elements as usize * (n_data_words as usize + n_pointers as usize),
        }
    }
}
