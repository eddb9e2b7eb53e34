use serde::Serialize;

/// Shape and memory footprint of a built index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Text length including the sentinel
    pub text_len: usize,
    /// Text length without the sentinel
    pub content_len: usize,
    /// Declared alphabet size
    pub alphabet_size: usize,
    /// Symbols that actually occur
    pub distinct_symbols: usize,
    pub checkpoint_interval: usize,
    pub checkpoint_count: usize,
    pub text_bytes: usize,
    pub suffix_array_bytes: usize,
    pub bwt_bytes: usize,
    pub c_table_bytes: usize,
    pub occ_bytes: usize,
}

impl IndexStats {
    pub fn total_bytes(&self) -> usize {
        self.text_bytes + self.suffix_array_bytes + self.bwt_bytes + self.c_table_bytes + self.occ_bytes
    }

    /// Index bytes spent per byte of original text
    pub fn bytes_per_text_byte(&self) -> f64 {
        if self.content_len == 0 {
            return 0.0;
        }
        self.total_bytes() as f64 / self.content_len as f64
    }
}

/// Display index statistics
pub fn show_stats(stats: &IndexStats) {
    println!("Index Statistics");
    println!("================");
    println!();
    println!("Text length:      {} (+1 sentinel)", stats.content_len);
    println!(
        "Alphabet:         {} declared, {} used",
        stats.alphabet_size, stats.distinct_symbols
    );
    println!(
        "Checkpoints:      every {} rows ({} rows)",
        stats.checkpoint_interval, stats.checkpoint_count
    );

    println!();
    println!("Memory:");
    println!("  {:15} {}", "text", format_size(stats.text_bytes));
    println!("  {:15} {}", "suffix array", format_size(stats.suffix_array_bytes));
    println!("  {:15} {}", "bwt", format_size(stats.bwt_bytes));
    println!("  {:15} {}", "c-table", format_size(stats.c_table_bytes));
    println!("  {:15} {}", "occ checkpoints", format_size(stats.occ_bytes));
    println!();
    println!(
        "Total:            {} ({:.2} bytes/text byte)",
        format_size(stats.total_bytes()),
        stats.bytes_per_text_byte()
    );
}

/// Format byte size to human readable
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
