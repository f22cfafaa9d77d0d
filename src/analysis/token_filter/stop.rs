//! Stop filter implementation.
//!
//! Removes Indonesian closed-class function words (pronouns, prepositions,
//! conjunctions, auxiliaries and their particle forms) from the token stream.
//!
//! # Examples
//!
//! ```
//! use akar::analysis::token::{IntoTokenStream, Token};
//! use akar::analysis::token_filter::Filter;
//! use akar::analysis::token_filter::stop::StopFilter;
//!
//! let filter = StopFilter::new();
//! let tokens = vec![
//!     Token::new("mereka", 0),
//!     Token::new("bermain", 1),
//!     Token::new("di", 2),
//!     Token::new("taman", 3),
//! ];
//!
//! let result: Vec<_> = filter.filter(tokens.into_token_stream())
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].text, "bermain");
//! assert_eq!(result[1].text, "taman");
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::{AkarError, Result};

/// Default Indonesian stopword list (closed-class function words and their
/// common particle and possessive variants).
pub const DEFAULT_INDONESIAN_STOP_WORDS: &[&str] = &[
    "ada", "adalah", "adanya", "adapun", "agak", "agaknya", "agar", "akan", "akankah", "akhir",
    "akhiri", "akhirnya", "aku", "akulah", "amat", "amatlah", "anda", "andalah", "antar", "antara",
    "antaranya", "apa", "apaan", "apabila", "apakah", "apalagi", "apatah", "artinya", "asal",
    "asalkan", "atas", "atau", "ataukah", "ataupun", "awal", "awalnya", "bagai", "bagaikan",
    "bagaimana", "bagaimanakah", "bagaimanapun", "bagi", "bagian", "bahkan", "bahwa", "bahwasanya",
    "baik", "bakal", "bakalan", "balik", "banyak", "bapak", "baru", "bawah", "beberapa", "begini",
    "beginian", "beginikah", "beginilah", "begitu", "begitukah", "begitulah", "begitupun",
    "bekerja", "belakang", "belakangan", "belum", "belumlah", "benar", "benarkah", "benarlah",
    "berada", "berakhir", "berakhirlah", "berakhirnya", "berapa", "berapakah", "berapalah",
    "berapapun", "berarti", "berawal", "berbagai", "berdatangan", "beri", "berikan", "berikut",
    "berikutnya", "berjumlah", "berkali", "berkata", "berkehendak", "berkeinginan", "berkenaan",
    "berlainan", "berlalu", "berlangsung", "berlebihan", "bermacam", "bermaksud", "bermula",
    "bersama", "bersedia", "bersiap", "bersoal", "bertanya", "bertanya-tanya", "berturut",
    "berturut-turut", "bertutur", "berujar", "berupa", "besar", "betul", "betulkah", "biasa",
    "biasanya", "bila", "bilakah", "bisa", "bisakah", "boleh", "bolehkah", "buat", "bukan",
    "bukankah", "bukanlah", "bukannya", "bulan", "bung", "cara", "caranya", "cukup", "cukupkah",
    "cukuplah", "cuma", "dahulu", "dalam", "dan", "dapat", "dari", "daripada", "datang", "dekat",
    "demi", "demikian", "demikianlah", "dengan", "depan", "di", "dia", "diakhiri", "diakhirinya",
    "dialah", "diantara", "diantaranya", "diberi", "diberikan", "diberikannya", "dibuat",
    "dibuatnya", "didapat", "didatangkan", "digunakan", "diibaratkan", "diibaratkannya", "diingat",
    "diingatkan", "diinginkan", "dijawab", "dijelaskan", "dijelaskannya", "dikarenakan",
    "dikatakan", "dikatakannya", "dikerjakan", "diketahui", "diketahuinya", "dikira", "dilakukan",
    "dilalui", "dilihat", "dimaksud", "dimaksudkan", "dimaksudkannya", "dimaksudnya", "diminta",
    "dimintai", "dimisalkan", "dimulai", "dimulailah", "dimulainya", "dimungkinkan", "dini",
    "dipastikan", "diperbuat", "diperbuatnya", "dipergunakan", "diperkirakan", "diperlihatkan",
    "diperlukan", "diperlukannya", "dipersoalkan", "dipertanyakan", "dipunyai", "diri", "dirinya",
    "disampaikan", "disebut", "disebutkan", "disebutkannya", "disini", "disinilah", "ditambahkan",
    "ditandaskan", "ditanya", "ditanyai", "ditanyakan", "ditegaskan", "ditujukan", "ditunjuk",
    "ditunjuki", "ditunjukkan", "ditunjukkannya", "ditunjuknya", "dituturkan", "dituturkannya",
    "diucapkan", "diucapkannya", "diungkapkan", "dong", "dulu", "empat", "enggak", "enggaknya",
    "entah", "entahlah", "guna", "gunakan", "hal", "hampir", "hanya", "hanyalah", "hari", "harus",
    "haruslah", "harusnya", "hendak", "hendaklah", "hendaknya", "hingga", "ia", "ialah", "ibarat",
    "ibaratkan", "ibaratnya", "ibu", "ikut", "ingat", "ingat-ingat", "ingin", "inginkah",
    "inginkan", "ini", "inikah", "inilah", "itu", "itukah", "itulah", "jadi", "jadilah", "jadinya",
    "jangan", "jangankan", "janganlah", "jauh", "jawab", "jawaban", "jawabnya", "jelas",
    "jelaskan", "jelaslah", "jelasnya", "jika", "jikalau", "juga", "jumlah", "jumlahnya", "justru",
    "kala", "kalau", "kalaulah", "kalaupun", "kalian", "kami", "kamilah", "kamu", "kamulah", "kan",
    "kapan", "kapankah", "kapanpun", "karena", "karenanya", "kasus", "kata", "katakan",
    "katakanlah", "katanya", "ke", "keadaan", "kebetulan", "kecil", "kedua", "keduanya",
    "keinginan", "kelamaan", "kelihatan", "kelihatannya", "keluar", "kemana", "kemari", "kemarin",
    "kemudian", "kenapa", "kepada", "kepadanya", "kesampaian", "keseluruhan", "keseluruhannya",
    "ketika", "kini", "kinilah", "kira", "kira-kira", "kiranya", "kita", "kitalah", "kok",
    "kurang", "lagi", "lagian", "lah", "lain", "lainnya", "lalu", "lama", "lamanya", "lanjut",
    "lanjutnya", "lebih", "lewat", "lima", "luar", "macam", "maka", "makanya", "makin", "malah",
    "malahan", "mampu", "mampukah", "mana", "manakala", "manalagi", "masa", "masalah",
    "masalahnya", "masih", "masihkah", "masing", "masing-masing", "mau", "maupun", "melainkan",
    "melakukan", "melalui", "melihat", "melihatnya", "memang", "memastikan", "memberi",
    "memberikan", "membuat", "memerlukan", "memihak", "meminta", "memintakan", "memisalkan",
    "memperbuat", "mempergunakan", "memperkirakan", "memperlihatkan", "mempersiapkan",
    "mempersoalkan", "mempertanyakan", "mempunyai", "memulai", "memungkinkan", "menaiki",
    "menambah", "menambahkan", "menanti", "menantikan", "menanya", "menanyai", "menanyakan",
    "mendapat", "mendapatkan", "mendatang", "mendatangi", "mendatangkan", "menegaskan",
    "mengakhiri", "mengapa", "mengatakan", "mengatakannya", "mengenai", "mengerjakan",
    "mengetahui", "menggunakan", "menghendaki", "mengibaratkan", "mengibaratkannya", "mengingat",
    "mengingatkan", "menginginkan", "mengira", "mengucapkan", "mengucapkannya", "mengungkapkan",
    "menjadi", "menjawab", "menjelaskan", "menuju", "menunjuk", "menunjuki", "menunjukkan",
    "menunjuknya", "menurut", "menuturkan", "menyampaikan", "menyangkut", "menyatakan",
    "menyebutkan", "menyeluruh", "menyiapkan", "merasa", "mereka", "merekalah", "merupakan",
    "meski", "meskipun", "minta", "mirip", "misal", "misalkan", "misalnya", "mula", "mulai",
    "mulailah", "mulanya", "mungkin", "mungkinkah", "nah", "naik", "namun", "nanti", "nantinya",
    "nyaris", "oleh", "olehnya", "pada", "padahal", "padanya", "pak", "paling", "panjang",
    "pantas", "para", "pasti", "pastilah", "penting", "pentingnya", "per", "percuma", "perlu",
    "perlukah", "perlunya", "pernah", "pernahkah", "pertama", "pertama-tama", "pertanyaan",
    "pertanyakan", "pihak", "pihaknya", "pukul", "pula", "pun", "punya", "punyakah", "rah", "rasa",
    "rasanya", "rata", "rupanya", "saat", "saatnya", "saja", "sajalah", "saling", "sama",
    "sama-sama", "sambil", "sampai", "sampai-sampai", "sampaikan", "sana", "sangat", "sangatlah",
    "sani", "satu", "saya", "sayalah", "se", "sebab", "sebabnya", "sebagai", "sebagaimana",
    "sebagainya", "sebagian", "sebaik", "sebaik-baiknya", "sebaiknya", "sebaliknya", "sebanyak",
    "sebegini", "sebegitu", "sebelum", "sebelumnya", "sebenarnya", "seberapa", "sebesar",
    "sebetulnya", "sebisanya", "sebuah", "sebut", "sebutlah", "sebutnya", "secara", "secukupnya",
    "sedang", "sedangkan", "sedemikian", "sedikit", "sedikitnya", "seenaknya", "segala",
    "segalanya", "segera", "seharusnya", "sehingga", "seingat", "sejak", "sejauh", "sejenak",
    "sejumlah", "sekadar", "sekadarnya", "sekali", "sekali-kali", "sekalian", "sekaligus",
    "sekalipun", "sekarang", "sekecil", "seketika", "sekiranya", "sekitar", "sekitarnya",
    "sekurang-kurangnya", "sekurangnya", "sela", "selain", "selaku", "selama", "selama-lamanya",
    "selamanya", "selanjutnya", "seluruh", "seluruhnya", "semacam", "semakin", "semampu",
    "semampunya", "semasa", "semasih", "semata", "semata-mata", "semaunya", "sementara", "semisal",
    "semisalnya", "sempat", "semua", "semuanya", "semula", "sendiri", "sendirian", "sendirinya",
    "seolah", "seolah-olah", "seorang", "sepanjang", "sepantasnya", "sepantasnyalah", "seperlunya",
    "seperti", "sepertinya", "sepihak", "sering", "seringnya", "serta", "serupa", "sesaat",
    "sesama", "sesampai", "sesegera", "sesekali", "seseorang", "sesuatu", "sesuatunya", "sesudah",
    "sesudahnya", "setelah", "setempat", "setengah", "seterusnya", "setiap", "setiba", "setibanya",
    "setidak-tidaknya", "setidaknya", "setinggi", "seusai", "sewajarnya", "sewaktu", "siap",
    "siapa", "siapakah", "siapapun", "sih", "sini", "sinilah", "soal", "soalnya", "suatu", "sudah",
    "sudahkah", "sudahlah", "supaya", "tadi", "tadinya", "tahu", "tahun", "tak", "tambah",
    "tambahnya", "tampak", "tampaknya", "tandas", "tandasnya", "tanpa", "tanya", "tanyakan",
    "tanyanya", "tapi", "tegas", "tegasnya", "telah", "tempat", "tengah", "tentang", "tentu",
    "tentulah", "tentunya", "tepat", "terakhir", "terasa", "terbanyak", "terdahulu", "terdapat",
    "terdiri", "terhadap", "terhadapnya", "teringat", "teringat-ingat", "terjadi", "terjadilah",
    "terjadinya", "terkira", "terlalu", "terlebih", "terlihat", "termasuk", "ternyata",
    "tersampaikan", "tersebut", "tersebutlah", "tertentu", "tertuju", "terus", "terutama", "tetap",
    "tetapi", "tiap", "tiba", "tiba-tiba", "tidak", "tidakkah", "tidaklah", "tiga", "tinggi",
    "toh", "tunjuk", "turut", "tutur", "tuturnya", "ucap", "ucapnya", "ujar", "ujarnya", "umum",
    "umumnya", "ungkap", "ungkapnya", "untuk", "usah", "usai", "waduh", "wah", "wahai", "waktu",
    "waktunya", "walau", "walaupun", "wong", "yaitu", "yakin", "yakni", "yang",
];

/// Default Indonesian stop words as a HashSet.
pub static DEFAULT_INDONESIAN_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_INDONESIAN_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// A filter that removes stop words from the token stream.
///
/// Order is preserved. With `remove_stopped(false)` the stop words stay in
/// the stream marked as stopped, which is what the normalizer's trace mode
/// uses to show what was dropped.
///
/// ```
/// use akar::analysis::token::{IntoTokenStream, Token};
/// use akar::analysis::token_filter::Filter;
/// use akar::analysis::token_filter::stop::StopFilter;
///
/// let filter = StopFilter::from_words(vec!["yang"]).remove_stopped(false);
/// let tokens = vec![Token::new("yang", 0), Token::new("baru", 1)];
///
/// let result: Vec<_> = filter.filter(tokens.into_token_stream())
///     .unwrap()
///     .collect();
///
/// assert_eq!(result.len(), 2);
/// assert!(result[0].is_stopped());
/// assert!(!result[1].is_stopped());
/// ```
#[derive(Clone, Debug)]
pub struct StopFilter {
    /// The set of stop words to remove
    stop_words: Arc<HashSet<String>>,
    /// Whether to remove stopped tokens entirely or just mark them as stopped
    remove_stopped: bool,
}

impl StopFilter {
    /// Create a new stop filter with the default Indonesian stop words.
    pub fn new() -> Self {
        Self::with_stop_words(DEFAULT_INDONESIAN_STOP_WORDS_SET.clone())
    }

    /// Create a new stop filter with custom stop words.
    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        StopFilter {
            stop_words: Arc::new(stop_words),
            remove_stopped: true,
        }
    }

    /// Create a new stop filter from a list of stop words.
    ///
    /// Words are lowercased so they match tokenizer output.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words = words
            .into_iter()
            .map(|s| s.into().to_lowercase())
            .collect();
        Self::with_stop_words(stop_words)
    }

    /// Load a stopword list, one word per line. Blank lines and `#` comments
    /// are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AkarError::artifact(format!("failed to read stopwords {}: {e}", path.display()))
        })?;

        Ok(Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        ))
    }

    /// Set whether to remove stopped tokens entirely or just mark them as stopped.
    pub fn remove_stopped(mut self, remove: bool) -> Self {
        self.remove_stopped = remove;
        self
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stop_words = Arc::clone(&self.stop_words);
        let remove_stopped = self.remove_stopped;

        Ok(Box::new(tokens.filter_map(move |token| {
            if token.is_stopped() || !stop_words.contains(&token.text) {
                Some(token)
            } else if remove_stopped {
                None
            } else {
                Some(token.stop())
            }
        })))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{IntoTokenStream, Token};

    #[test]
    fn test_stop_filter() {
        let filter = StopFilter::from_words(vec!["dan", "atau", "yang"]);
        let tokens = vec![
            Token::new("buku", 0),
            Token::new("dan", 1),
            Token::new("pensil", 2),
            Token::new("yang", 3),
            Token::new("baru", 4),
        ];

        let result: Vec<_> = filter.filter(tokens.into_token_stream()).unwrap().collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "buku");
        assert_eq!(result[1].text, "pensil");
        assert_eq!(result[2].text, "baru");
        assert_eq!(result[2].position, 4);
    }

    #[test]
    fn test_default_indonesian_list() {
        let filter = StopFilter::new();

        assert!(filter.is_stop_word("mereka"));
        assert!(filter.is_stop_word("di"));
        assert!(filter.is_stop_word("sama-sama"));
        assert!(!filter.is_stop_word("taman"));
        assert!(!filter.is_stop_word("bermain-main"));
        assert_eq!(filter.len(), DEFAULT_INDONESIAN_STOP_WORDS.len());
    }

    #[test]
    fn test_from_words_lowercases() {
        let filter = StopFilter::from_words(vec!["YANG"]);
        assert!(filter.is_stop_word("yang"));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_stop_filter_preserve_stopped() {
        let filter = StopFilter::from_words(vec!["di"]).remove_stopped(false);
        let tokens = vec![Token::new("di", 0), Token::new("pasar", 1)];

        let result: Vec<_> = filter.filter(tokens.into_token_stream()).unwrap().collect();

        assert_eq!(result.len(), 2);
        assert!(result[0].is_stopped());
        assert!(!result[1].is_stopped());
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::new().name(), "stop");
    }

    #[test]
    fn test_load_skips_comments() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "# custom list\nyang\n\n  Dan  \n").unwrap();

        let filter = StopFilter::load(file.path()).unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter.is_stop_word("dan"));

        assert!(matches!(
            StopFilter::load("/nonexistent/stopwords.txt"),
            Err(AkarError::Artifact(_))
        ));
    }
}
