//! Filesystem header value objects.
//!
//! The remote filesystem itself is an external collaborator; the codec only
//! carries its fixed 12-byte header record opaquely inside file-property
//! operands.

/// Wire size of a serialized file header.
pub const FILE_HEADER_SIZE: usize = 12;

/// Storage class of a remote file (low 2 bits of the properties byte).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Transient = 0,
    Volatile = 1,
    Restorable = 2,
    Permanent = 3,
}

impl StorageClass {
    /// Decode from the low 2 bits of a properties byte.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => StorageClass::Transient,
            1 => StorageClass::Volatile,
            2 => StorageClass::Restorable,
            _ => StorageClass::Permanent,
        }
    }
}

/// The fixed filesystem header record carried by file-property operands.
///
/// Layout on the wire: permissions (1), properties (1, storage class in the
/// low 2 bits), alp_command_file_id (1), interface_file_id (1), length
/// (u32 BE), allocated_length (u32 BE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub permissions: u8,
    pub storage_class: StorageClass,
    pub alp_command_file_id: u8,
    pub interface_file_id: u8,
    pub length: u32,
    pub allocated_length: u32,
}

impl FileHeader {
    /// Header for a freshly created file of `length` bytes.
    pub fn for_new_file(length: u32, storage_class: StorageClass) -> Self {
        Self {
            permissions: 0,
            storage_class,
            alp_command_file_id: 0,
            interface_file_id: 0,
            length,
            allocated_length: length,
        }
    }

    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut out = [0u8; FILE_HEADER_SIZE];
        out[0] = self.permissions;
        out[1] = self.storage_class as u8;
        out[2] = self.alp_command_file_id;
        out[3] = self.interface_file_id;
        out[4..8].copy_from_slice(&self.length.to_be_bytes());
        out[8..12].copy_from_slice(&self.allocated_length.to_be_bytes());
        out
    }

    pub fn from_bytes(raw: [u8; FILE_HEADER_SIZE]) -> Self {
        Self {
            permissions: raw[0],
            storage_class: StorageClass::from_bits(raw[1]),
            alp_command_file_id: raw[2],
            interface_file_id: raw[3],
            length: u32::from_be_bytes(raw[4..8].try_into().expect("4-byte slice")),
            allocated_length: u32::from_be_bytes(raw[8..12].try_into().expect("4-byte slice")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrips_through_fixed_record() {
        let header = FileHeader {
            permissions: 0x24,
            storage_class: StorageClass::Permanent,
            alp_command_file_id: 0x10,
            interface_file_id: 0x11,
            length: 0x0102_0304,
            allocated_length: 0x0102_0400,
        };
        assert_eq!(FileHeader::from_bytes(header.to_bytes()), header);
    }

    #[test]
    fn new_file_header_allocates_full_length() {
        let header = FileHeader::for_new_file(64, StorageClass::Restorable);
        assert_eq!(header.length, 64);
        assert_eq!(header.allocated_length, 64);
        assert_eq!(header.storage_class, StorageClass::Restorable);
    }
}
