use crate::geometry;
use crate::skeleton::Side;

use super::events::FootStrike;
use super::phases::StancePhase;

/// Spatiotemporal parameters of one stride.
///
/// A stride spans two consecutive strikes of the same foot. Step metrics
/// are present only when exactly one strike of the other foot falls inside
/// the stride. Lengths are in output units (sensor units × `unit_scale`),
/// times in seconds.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GaitRecord {
    pub pass_index: usize,
    pub side: Side,
    pub frame_i: usize,
    pub frame_f: usize,
    pub stride_length: f64,
    pub stride_time: f64,
    pub stride_velocity: f64,
    /// Head displacement between the two strikes over the stride time.
    pub head_stride_velocity: f64,
    /// Steps per minute.
    pub cadence: f64,
    /// Share of the stride (percent) spent in the stance phase that follows
    /// the initial strike.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stance_percentage: Option<f64>,
    /// Distance from the final strike to the other foot's strike projected
    /// on the stride line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_step_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_time: Option<f64>,
    /// Distance from the other foot's strike to the stride line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stride_width: Option<f64>,
}

/// Stride records from the strikes of one pass.
///
/// `strikes` must be sorted by frame. Fewer than two strikes of a foot give
/// no record for that foot. The stance percentage uses the first stance
/// phase of the striking foot that overlaps the stride.
pub fn stride_records(
    pass_index: usize,
    strikes: &[FootStrike],
    stances: &[StancePhase],
    frame_rate: f64,
    unit_scale: f64,
) -> Vec<GaitRecord> {
    let mut records = Vec::new();
    for side in [Side::Left, Side::Right] {
        let same: Vec<&FootStrike> = strikes.iter().filter(|s| s.side == side).collect();
        for pair in same.windows(2) {
            let (a_i, a_f) = (pair[0], pair[1]);
            let stride_length = (a_f.position - a_i.position).norm() * unit_scale;
            let stride_time = (a_f.frame - a_i.frame) as f64 / frame_rate;
            let head_distance = (a_f.head - a_i.head).norm() * unit_scale;
            let stance_percentage = stances
                .iter()
                .find(|p| p.side == side && p.frame_f >= a_i.frame && p.frame_i < a_f.frame)
                .map(|p| {
                    let stance_time = (p.frame_f - p.frame_i) as f64 / frame_rate;
                    100.0 * stance_time / stride_time
                });

            let mut record = GaitRecord {
                pass_index,
                side,
                frame_i: a_i.frame,
                frame_f: a_f.frame,
                stride_length,
                stride_time,
                stride_velocity: stride_length / stride_time,
                head_stride_velocity: head_distance / stride_time,
                cadence: 120.0 / stride_time,
                stance_percentage,
                step_length: None,
                absolute_step_length: None,
                step_time: None,
                stride_width: None,
            };

            let mut between = strikes
                .iter()
                .filter(|s| s.side != side && s.frame > a_i.frame && s.frame < a_f.frame);
            if let (Some(b), None) = (between.next(), between.next()) {
                record.absolute_step_length =
                    Some((a_f.position - b.position).norm() * unit_scale);
                record.step_time = Some((a_f.frame - b.frame) as f64 / frame_rate);
                if let Ok(proj) =
                    geometry::project_point_line(&b.position, &a_i.position, &a_f.position)
                {
                    record.step_length = Some((a_f.position - proj).norm() * unit_scale);
                    record.stride_width = Some((b.position - proj).norm() * unit_scale);
                }
            }
            records.push(record);
        }
    }
    records.sort_by_key(|r| (r.frame_i, r.side == Side::Right));
    records
}
