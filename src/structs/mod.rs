pub mod arithmetic;
pub mod bit_io;
pub mod golomb;
pub mod huffman;
pub mod lzss;
pub mod lzw;
pub mod mtf;
pub mod order0_model;
pub mod ppm;
pub mod rice;
pub mod rle;
pub mod unary;
pub mod vlc;
