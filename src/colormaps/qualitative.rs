//! Qualitative colormaps (short lists of distinct colors).
//!
//! Used for categorical maps, where the first `n` colors of the list are
//! assigned to `n` sorted categories.

use super::colormap::ListedColormap;

const SET1: [u32; 9] = [
    0xe41a1c, 0x377eb8, 0x4daf4a, 0x984ea3, 0xff7f00, 0xffff33, 0xa65628, 0xf781bf, 0x999999,
];

const SET2: [u32; 8] = [
    0x66c2a5, 0xfc8d62, 0x8da0cb, 0xe78ac3, 0xa6d854, 0xffd92f, 0xe5c494, 0xb3b3b3,
];

const DARK2: [u32; 8] = [
    0x1b9e77, 0xd95f02, 0x7570b3, 0xe7298a, 0x66a61e, 0xe6ab02, 0xa6761d, 0x666666,
];

const PASTEL1: [u32; 9] = [
    0xfbb4ae, 0xb3cde3, 0xccebc5, 0xdecbe4, 0xfed9a6, 0xffffcc, 0xe5d8bd, 0xfddaec, 0xf2f2f2,
];

const PAIRED: [u32; 12] = [
    0xa6cee3, 0x1f78b4, 0xb2df8a, 0x33a02c, 0xfb9a99, 0xe31a1c, 0xfdbf6f, 0xff7f00, 0xcab2d6,
    0x6a3d9a, 0xffff99, 0xb15928,
];

const TAB10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

const TAB20: [u32; 20] = [
    0x1f77b4, 0xaec7e8, 0xff7f0e, 0xffbb78, 0x2ca02c, 0x98df8a, 0xd62728, 0xff9896, 0x9467bd,
    0xc5b0d5, 0x8c564b, 0xc49c94, 0xe377c2, 0xf7b6d2, 0x7f7f7f, 0xc7c7c7, 0xbcbd22, 0xdbdb8d,
    0x17becf, 0x9edae5,
];

const TAB20C: [u32; 20] = [
    0x3182bd, 0x6baed6, 0x9ecae1, 0xc6dbef, 0xe6550d, 0xfd8d3c, 0xfdae6b, 0xfdd0a2, 0x31a354,
    0x74c476, 0xa1d99b, 0xc7e9c0, 0x756bb1, 0x9e9ac8, 0xbcbddc, 0xdadaeb, 0x636363, 0x969696,
    0xbdbdbd, 0xd9d9d9,
];

/// Look up a qualitative colormap by lower-case name
pub fn lookup(name: &str) -> Option<ListedColormap> {
    let listed = match name.to_lowercase().as_str() {
        "set1" => ListedColormap::from_hex("Set1", &SET1),
        "set2" => ListedColormap::from_hex("Set2", &SET2),
        "dark2" => ListedColormap::from_hex("Dark2", &DARK2),
        "pastel1" => ListedColormap::from_hex("Pastel1", &PASTEL1),
        "paired" => ListedColormap::from_hex("Paired", &PAIRED),
        "tab10" => ListedColormap::from_hex("tab10", &TAB10),
        "tab20" => ListedColormap::from_hex("tab20", &TAB20),
        "tab20c" => ListedColormap::from_hex("tab20c", &TAB20C),
        _ => return None,
    };
    Some(listed)
}
