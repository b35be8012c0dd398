//! Built-in hotspot catalog: well-known Seoul gathering areas.
//!
//! Used as the candidate set for hotspot-priority ranking and as the offline
//! fallback for address search.

use crate::geo::Coordinate;
use serde::Serialize;

/// A compiled-in gathering area.
#[derive(Debug)]
pub struct Hotspot {
    /// Canonical name first, then aliases (lower-case romanizations).
    pub names: &'static [&'static str],
    pub lat: f64,
    pub lon: f64,
    pub description: &'static str,
}

impl Hotspot {
    /// Canonical name; empty for an entry without names.
    pub fn name(&self) -> &'static str {
        self.names.first().copied().unwrap_or_default()
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

pub const HOTSPOTS: &[Hotspot] = &[
    Hotspot {
        names: &["강남역", "gangnam", "강남"],
        lat: 37.4979, lon: 127.0276,
        description: "대표 번화가, 맛집과 술집 밀집",
    },
    Hotspot {
        names: &["홍대입구역", "hongdae", "홍대"],
        lat: 37.5572, lon: 126.9245,
        description: "공연, 클럽, 개성 있는 카페 거리",
    },
    Hotspot {
        names: &["신촌역", "sinchon", "신촌"],
        lat: 37.5551, lon: 126.9368,
        description: "대학가 먹자골목",
    },
    Hotspot {
        names: &["이태원역", "itaewon", "이태원"],
        lat: 37.5345, lon: 126.9946,
        description: "세계 음식과 바",
    },
    Hotspot {
        names: &["명동역", "myeongdong", "명동"],
        lat: 37.5609, lon: 126.9863,
        description: "쇼핑과 길거리 음식",
    },
    Hotspot {
        names: &["종로3가역", "jongno", "종로"],
        lat: 37.5704, lon: 126.9921,
        description: "익선동 한옥 골목과 포장마차",
    },
    Hotspot {
        names: &["잠실역", "jamsil", "잠실"],
        lat: 37.5133, lon: 127.1001,
        description: "롯데월드와 석촌호수",
    },
    Hotspot {
        names: &["건대입구역", "konkuk", "건대"],
        lat: 37.5404, lon: 127.0693,
        description: "커먼그라운드와 양꼬치 거리",
    },
    Hotspot {
        names: &["성수역", "seongsu", "성수"],
        lat: 37.5446, lon: 127.0557,
        description: "팝업스토어와 카페 거리",
    },
    Hotspot {
        names: &["합정역", "hapjeong", "합정"],
        lat: 37.5496, lon: 126.9139,
        description: "망원동과 이어지는 카페 골목",
    },
    Hotspot {
        names: &["여의도역", "yeouido", "여의도"],
        lat: 37.5216, lon: 126.9243,
        description: "더현대와 한강공원",
    },
    Hotspot {
        names: &["영등포역", "yeongdeungpo", "영등포"],
        lat: 37.5156, lon: 126.9075,
        description: "타임스퀘어 쇼핑몰",
    },
    Hotspot {
        names: &["신림역", "sillim", "신림"],
        lat: 37.4842, lon: 126.9297,
        description: "순대타운과 고시촌 맛집",
    },
    Hotspot {
        names: &["사당역", "sadang", "사당"],
        lat: 37.4765, lon: 126.9816,
        description: "남부 환승 거점, 술집 밀집",
    },
    Hotspot {
        names: &["교대역", "gyodae", "교대"],
        lat: 37.4934, lon: 127.0141,
        description: "고깃집 골목",
    },
    Hotspot {
        names: &["삼성역", "samseong", "코엑스"],
        lat: 37.5088, lon: 127.0631,
        description: "코엑스몰과 별마당 도서관",
    },
    Hotspot {
        names: &["선릉역", "seolleung", "선릉"],
        lat: 37.5045, lon: 127.0490,
        description: "직장인 회식 상권",
    },
    Hotspot {
        names: &["왕십리역", "wangsimni", "왕십리"],
        lat: 37.5612, lon: 127.0371,
        description: "곱창 골목과 비트플렉스",
    },
    Hotspot {
        names: &["혜화역", "hyehwa", "대학로"],
        lat: 37.5822, lon: 127.0018,
        description: "대학로 소극장 거리",
    },
    Hotspot {
        names: &["서울역", "seoul station"],
        lat: 37.5547, lon: 126.9707,
        description: "KTX 환승 거점",
    },
    Hotspot {
        names: &["용산역", "yongsan", "용산"],
        lat: 37.5298, lon: 126.9648,
        description: "아이파크몰과 용리단길",
    },
    Hotspot {
        names: &["노원역", "nowon", "노원"],
        lat: 37.6543, lon: 127.0565,
        description: "북부 최대 상권",
    },
    Hotspot {
        names: &["수유역", "suyu", "수유"],
        lat: 37.6380, lon: 127.0257,
        description: "강북 먹자골목",
    },
    Hotspot {
        names: &["연신내역", "yeonsinnae", "연신내"],
        lat: 37.6190, lon: 126.9210,
        description: "서북부 로데오 거리",
    },
    Hotspot {
        names: &["천호역", "cheonho", "천호"],
        lat: 37.5386, lon: 127.1236,
        description: "강동 로데오와 현대백화점",
    },
    Hotspot {
        names: &["목동역", "mokdong", "목동"],
        lat: 37.5259, lon: 126.8750,
        description: "현대백화점과 학원가",
    },
    Hotspot {
        names: &["구로디지털단지역", "guro digital", "구디"],
        lat: 37.4852, lon: 126.9015,
        description: "직장인 상권과 샤로수길 접근",
    },
    Hotspot {
        names: &["신논현역", "sinnonhyeon", "신논현"],
        lat: 37.5046, lon: 127.0250,
        description: "강남대로 북단 먹자골목",
    },
    Hotspot {
        names: &["압구정로데오역", "apgujeong rodeo", "압구정"],
        lat: 37.5273, lon: 127.0405,
        description: "갤러리아와 로데오 거리",
    },
    Hotspot {
        names: &["서울대입구역", "snu", "샤로수길"],
        lat: 37.4812, lon: 126.9527,
        description: "샤로수길 맛집 거리",
    },
];

/// Compute edit distance between two strings (Levenshtein, by `char`).
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Search the catalog: exact name/alias, then substring, then edit distance <= 2.
pub fn builtin_lookup(query: &str) -> Option<&'static Hotspot> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }

    if let Some(spot) = HOTSPOTS.iter().find(|h| h.names.iter().any(|n| *n == q)) {
        return Some(spot);
    }

    if let Some(spot) = HOTSPOTS
        .iter()
        .find(|h| h.names.iter().any(|n| n.contains(q.as_str()) || q.contains(n)))
    {
        return Some(spot);
    }

    let mut best: Option<(&Hotspot, usize)> = None;
    for spot in HOTSPOTS {
        for name in spot.names {
            let dist = edit_distance(&q, name);
            if dist <= 2 && best.map_or(true, |(_, d)| dist < d) {
                best = Some((spot, dist));
            }
        }
    }
    best.map(|(spot, _)| spot)
}

/// A hotspot entry for the public catalog API.
#[derive(Debug, Clone, Serialize)]
pub struct HotspotInfo {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub description: String,
}

pub fn hotspot_list() -> Vec<HotspotInfo> {
    HOTSPOTS
        .iter()
        .map(|h| HotspotInfo {
            name: h.name().to_string(),
            lat: h.lat,
            lon: h.lon,
            description: h.description.to_string(),
        })
        .collect()
}
