//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Mask selecting the permission bits of a mode, including setuid, setgid and sticky.
pub const PERMISSION_BITS_MASK: u32 = 0o7777;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Formats the permission bits of a mode the way `ls -l` does.
///
/// ## Examples
///
/// ```
/// use monomerge::utils::format_mode;
///
/// assert_eq!(format_mode(0o755), "rwxr-xr-x");
/// assert_eq!(format_mode(0o4755), "rwsr-xr-x");
/// assert_eq!(format_mode(0o1777), "rwxrwxrwt");
/// assert_eq!(format_mode(0o000), "---------");
/// ```
pub fn format_mode(mode: u32) -> String {
    let special = [(0o4000, 0o100, 's', 'S'), (0o2000, 0o010, 's', 'S'), (0o1000, 0o001, 't', 'T')];
    let mut out = String::with_capacity(9);

    for (class, (special_bit, exec_bit, set_exec, set_noexec)) in special.iter().enumerate() {
        let shift = 6 - class * 3;
        out.push(if mode & (0o4 << shift) != 0 { 'r' } else { '-' });
        out.push(if mode & (0o2 << shift) != 0 { 'w' } else { '-' });

        let executable = mode & exec_bit != 0;
        out.push(match (mode & special_bit != 0, executable) {
            (true, true) => *set_exec,
            (true, false) => *set_noexec,
            (false, true) => 'x',
            (false, false) => '-',
        });
    }

    out
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mode_plain_bits() {
        assert_eq!(format_mode(0o644), "rw-r--r--");
        assert_eq!(format_mode(0o311), "-wx--x--x");
        assert_eq!(format_mode(0o40755), "rwxr-xr-x");
    }

    #[test]
    fn test_format_mode_special_bits_without_exec() {
        assert_eq!(format_mode(0o6644), "rwSr-Sr--");
        assert_eq!(format_mode(0o1666), "rw-rw-rwT");
    }
}
